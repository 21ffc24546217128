//! User management pages (administrators only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::{Role, UserId};

use crate::components::{Chrome, DataTableConfig, Page, users_table_config};
use crate::error::AppError;
use crate::filters;
use crate::models::{FieldError, Identity, UserForm};
use crate::state::AppState;
use crate::store::StoreError;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users_page).post(create_user))
        .route("/users/{id}", post(update_user))
        .route("/users/{id}/delete", post(delete_user))
}

/// User row for the table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub initial: String,
    pub role: &'static str,
    pub role_class: &'static str,
    pub created: String,
    pub last_login: String,
    pub is_self: bool,
}

impl UserRow {
    fn new(user: &Identity, acting: UserId) -> Self {
        Self {
            id: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            initial: user.initial(),
            role: user.role.as_str(),
            role_class: match user.role {
                Role::Admin => "badge-admin",
                Role::Assistant => "badge-assistant",
                Role::Cashier => "badge-cashier",
            },
            created: user.created_at.format("%b %-d, %Y").to_string(),
            last_login: user
                .last_login
                .map_or_else(|| "Never".to_string(), |t| t.format("%b %-d, %Y").to_string()),
            is_self: user.id == acting,
        }
    }
}

/// A role option in the form's select.
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The add/edit form as rendered.
#[derive(Debug, Clone)]
pub struct UserFormView {
    pub action: String,
    pub title: &'static str,
    pub submit: &'static str,
    pub open: bool,
    pub name: String,
    pub email: String,
    pub roles: Vec<RoleOption>,
    pub errors: Vec<FieldError>,
}

impl UserFormView {
    fn new(action: String, title: &'static str, submit: &'static str, values: &UserForm) -> Self {
        Self {
            action,
            title,
            submit,
            open: false,
            name: values.name.clone(),
            email: values.email.clone(),
            roles: Role::ALL
                .iter()
                .map(|role| RoleOption {
                    value: role.as_str(),
                    label: role.label(),
                    selected: role.as_str() == values.role,
                })
                .collect(),
            errors: Vec::new(),
        }
    }

    fn blank() -> Self {
        Self::new(
            "/users".to_string(),
            "Add New User",
            "Add User",
            &UserForm::default(),
        )
    }

    fn editing(user: &Identity) -> Self {
        let values = UserForm {
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.as_str().to_string(),
        };
        let mut view = Self::new(
            format!("/users/{}", user.id),
            "Edit User",
            "Update User",
            &values,
        );
        view.open = true;
        view
    }

    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub chrome: Chrome,
    pub table: DataTableConfig,
    pub rows: Vec<UserRow>,
    pub query: String,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
    pub form: UserFormView,
}

/// Query parameters for the users page.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub q: Option<String>,
    pub edit: Option<i32>,
    pub notice: Option<String>,
}

fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "created" => Some("User created successfully"),
        "updated" => Some("User updated successfully"),
        "deleted" => Some("User deleted successfully"),
        _ => None,
    }
}

async fn render(
    state: &AppState,
    page: Page,
    query: String,
    notice: Option<&'static str>,
    error: Option<String>,
    form: UserFormView,
) -> UsersTemplate {
    let users = state.store().users.read().await;
    UsersTemplate {
        rows: users
            .search(&query)
            .into_iter()
            .map(|u| UserRow::new(u, page.identity.id))
            .collect(),
        chrome: page.chrome,
        table: users_table_config(),
        query,
        notice,
        error,
        form,
    }
}

/// User list with search and the add/edit form.
///
/// GET /users
#[instrument(skip(page, state))]
async fn users_page(
    page: Page,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<UsersTemplate, AppError> {
    let form = match query.edit {
        Some(id) => {
            let users = state.store().users.read().await;
            UserFormView::editing(users.get(UserId::new(id))?)
        }
        None => UserFormView::blank(),
    };
    Ok(render(
        &state,
        page,
        query.q.unwrap_or_default(),
        query.notice.as_deref().and_then(notice_text),
        None,
        form,
    )
    .await)
}

/// Re-render with the submitted values and what went wrong.
async fn rejected(
    state: &AppState,
    page: Page,
    form: UserFormView,
    errors: Vec<FieldError>,
    error: Option<String>,
) -> Response {
    let form = UserFormView {
        open: true,
        errors,
        ..form
    };
    let body = render(state, page, String::new(), None, error, form).await;
    (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
}

fn store_message(error: &StoreError) -> Option<String> {
    match error {
        StoreError::Conflict(message) | StoreError::Validation(message) => Some(message.clone()),
        StoreError::NotFound(_) => None,
    }
}

/// Create a user.
///
/// POST /users
#[instrument(skip(page, state, form), fields(email = %form.email))]
async fn create_user(
    page: Page,
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Response {
    let view = UserFormView::new(
        "/users".to_string(),
        "Add New User",
        "Add User",
        &form,
    );
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return rejected(&state, page, view, errors, None).await,
    };

    let now = state.clock().now();
    let created = state.store().users.write().await.create(draft, now);
    match created {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = user.role.as_str(), "User created");
            Redirect::to("/users?notice=created").into_response()
        }
        Err(e) => match store_message(&e) {
            Some(message) => rejected(&state, page, view, Vec::new(), Some(message)).await,
            None => AppError::from(e).into_response(),
        },
    }
}

/// Update a user's name, email and role.
///
/// POST /users/{id}
#[instrument(skip(page, state, form))]
async fn update_user(
    page: Page,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> Response {
    let id = UserId::new(id);
    let view = UserFormView::new(format!("/users/{id}"), "Edit User", "Update User", &form);
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return rejected(&state, page, view, errors, None).await,
    };

    let updated = state.store().users.write().await.update(id, draft);
    match updated {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = user.role.as_str(), "User updated");
            Redirect::to("/users?notice=updated").into_response()
        }
        Err(e) => match store_message(&e) {
            Some(message) => rejected(&state, page, view, Vec::new(), Some(message)).await,
            None => AppError::from(e).into_response(),
        },
    }
}

/// Delete a user other than the one signed in.
///
/// POST /users/{id}/delete
#[instrument(skip(page, state))]
async fn delete_user(page: Page, State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let acting = page.identity.id;
    let deleted = state
        .store()
        .users
        .write()
        .await
        .delete(UserId::new(id), acting);
    match deleted {
        Ok(user) => {
            tracing::info!(user_id = %user.id, acting = %acting, "User deleted");
            Redirect::to("/users?notice=deleted").into_response()
        }
        Err(e) => match store_message(&e) {
            Some(message) => {
                let body = render(
                    &state,
                    page,
                    String::new(),
                    None,
                    Some(message),
                    UserFormView::blank(),
                )
                .await;
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            None => AppError::from(e).into_response(),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockroom_core::Email;

    use super::*;

    fn user(id: i32, role: Role) -> Identity {
        Identity {
            id: UserId::new(id),
            email: Email::parse("sam@inventory.com").unwrap_or_else(|_| unreachable!()),
            name: "Sam".to_string(),
            role,
            avatar: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_row_marks_self_and_never_logged_in() {
        let row = UserRow::new(&user(2, Role::Cashier), UserId::new(2));
        assert!(row.is_self);
        assert_eq!(row.last_login, "Never");
        assert_eq!(row.role_class, "badge-cashier");
    }

    #[test]
    fn test_edit_form_selects_current_role() {
        let view = UserFormView::editing(&user(4, Role::Assistant));
        let selected: Vec<_> = view.roles.iter().filter(|r| r.selected).map(|r| r.value).collect();
        assert_eq!(selected, vec!["assistant"]);
        assert_eq!(view.action, "/users/4");
    }
}
