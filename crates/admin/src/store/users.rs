//! Console user table.

use chrono::{DateTime, Utc};

use stockroom_core::{Email, Role, UserId};

use super::StoreError;
use crate::models::{Identity, UserDraft};

/// Users keyed by id, kept in insertion order.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Vec<Identity>,
    next_id: UserId,
}

impl UserStore {
    #[must_use]
    pub fn new(users: Vec<Identity>) -> Self {
        let next_id = users
            .iter()
            .map(|u| u.id)
            .max()
            .map_or(UserId::new(1), |id| id.next());
        Self { users, next_id }
    }

    #[must_use]
    pub fn list(&self) -> &[Identity] {
        &self.users
    }

    /// Users whose name, email or role contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Identity> {
        let needle = query.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.as_str().contains(&needle)
                    || u.role.as_str().contains(&needle)
            })
            .collect()
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no user has this id.
    pub fn get(&self, id: UserId) -> Result<&Identity, StoreError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("user"))
    }

    /// Look up a user by email.
    #[must_use]
    pub fn find_by_email(&self, email: &Email) -> Option<&Identity> {
        self.users.iter().find(|u| &u.email == email)
    }

    /// Add a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered.
    pub fn create(&mut self, draft: UserDraft, now: DateTime<Utc>) -> Result<Identity, StoreError> {
        self.ensure_unique_email(&draft, None)?;
        let user = Identity {
            id: self.next_id,
            email: draft.email,
            name: draft.name,
            role: draft.role,
            avatar: None,
            created_at: now,
            last_login: None,
        };
        self.next_id = self.next_id.next();
        self.users.push(user.clone());
        Ok(user)
    }

    /// Change a user's name, email and role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id,
    /// `StoreError::Conflict` for a duplicate email, or
    /// `StoreError::Validation` if the change would leave no administrator.
    pub fn update(&mut self, id: UserId, draft: UserDraft) -> Result<Identity, StoreError> {
        self.ensure_unique_email(&draft, Some(id))?;
        let current = self.get(id)?;
        if current.role == Role::Admin && draft.role != Role::Admin && self.admin_count() == 1 {
            return Err(StoreError::Validation(
                "at least one administrator must remain".to_string(),
            ));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("user"))?;
        user.name = draft.name;
        user.email = draft.email;
        user.role = draft.role;
        Ok(user.clone())
    }

    /// Remove a user. `acting` is the user performing the deletion.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, or
    /// `StoreError::Validation` when deleting your own account.
    pub fn delete(&mut self, id: UserId, acting: UserId) -> Result<Identity, StoreError> {
        if id == acting {
            return Err(StoreError::Validation(
                "you cannot delete your own account".to_string(),
            ));
        }
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound("user"))?;
        Ok(self.users.remove(index))
    }

    /// Stamp a successful sign-in.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id.
    pub fn record_login(&mut self, id: UserId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("user"))?;
        user.last_login = Some(at);
        Ok(())
    }

    fn admin_count(&self) -> usize {
        self.users.iter().filter(|u| u.role == Role::Admin).count()
    }

    fn ensure_unique_email(&self, draft: &UserDraft, except: Option<UserId>) -> Result<(), StoreError> {
        if self
            .users
            .iter()
            .any(|u| Some(u.id) != except && u.email == draft.email)
        {
            return Err(StoreError::Conflict(format!(
                "{} is already registered",
                draft.email
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stockroom_core::Email;

    use super::*;
    use crate::store::seed;

    fn store() -> UserStore {
        UserStore::new(seed::users(Utc::now()))
    }

    fn draft(email: &str, role: Role) -> UserDraft {
        UserDraft {
            name: "New Person".to_string(),
            email: Email::parse(email).unwrap(),
            role,
        }
    }

    #[test]
    fn test_search_matches_role() {
        let store = store();
        let found: Vec<_> = store.search("cash").iter().map(|u| u.role).collect();
        assert_eq!(found, vec![Role::Cashier]);
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let mut store = store();
        let err = store
            .create(draft("ADMIN@inventory.com", Role::Cashier), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        let created = store
            .create(draft("new@inventory.com", Role::Cashier), Utc::now())
            .unwrap();
        assert_eq!(created.id, UserId::new(4));
    }

    #[test]
    fn test_last_admin_cannot_be_demoted() {
        let mut store = store();
        let err = store
            .update(UserId::new(1), draft("admin@inventory.com", Role::Cashier))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_cannot_delete_self() {
        let mut store = store();
        let err = store.delete(UserId::new(1), UserId::new(1)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.delete(UserId::new(3), UserId::new(1)).is_ok());
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_record_login() {
        let mut store = store();
        let at = Utc::now();
        store.record_login(UserId::new(2), at).unwrap();
        assert_eq!(store.get(UserId::new(2)).unwrap().last_login, Some(at));
        assert!(store.record_login(UserId::new(99), at).is_err());
    }
}
