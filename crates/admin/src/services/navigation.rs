//! Destination registry and the authorization gate.
//!
//! Every navigable page is listed once in [`DestinationRegistry::standard`]
//! together with the roles allowed to view it. Requests are resolved against
//! the registry by their first path segment, so `/products/3/delete` is
//! governed by the `/products` rule.

use stockroom_core::Role;

use crate::models::Identity;

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Login,
    Dashboard,
    Products,
    Sales,
    Analytics,
    Users,
    Settings,
    Assistant,
    Logout,
    Preferences,
}

impl Destination {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Sales => "Sales",
            Self::Analytics => "Analytics",
            Self::Users => "Users",
            Self::Settings => "Settings",
            Self::Assistant => "AI Assistant",
            Self::Logout => "Sign out",
            Self::Preferences => "Preferences",
        }
    }
}

/// Who may view a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Signed-in identities whose role is listed. An empty list admits every
    /// signed-in identity.
    Roles(&'static [Role]),
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub destination: Destination,
    /// First path segment, including the leading slash.
    pub path: &'static str,
    pub access: Access,
    /// Listed in the sidebar navigation.
    pub in_sidebar: bool,
    /// Sidebar icon glyph.
    pub icon: &'static str,
}

/// Outcome of resolving a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show the destination.
    Render(Destination),
    /// Anonymous caller; show the login page. `return_to` is the path to
    /// come back to after signing in.
    Login { return_to: Option<String> },
    /// Signed in, but the role is not allowed.
    Forbidden { destination: Destination },
    /// Send the caller elsewhere.
    Redirect(&'static str),
    /// No such destination.
    NotFound,
}

/// Where callers land after signing in when nothing was remembered.
pub const HOME_PATH: &str = "/dashboard";

/// Static mapping of destinations to required roles.
#[derive(Debug, Clone)]
pub struct DestinationRegistry {
    rules: &'static [RouteRule],
}

const ANY_SIGNED_IN: Access = Access::Roles(&[]);

static STANDARD_RULES: [RouteRule; 10] = [
    RouteRule {
        destination: Destination::Login,
        path: "/login",
        access: Access::Public,
        in_sidebar: false,
        icon: "",
    },
    RouteRule {
        destination: Destination::Logout,
        path: "/logout",
        access: Access::Public,
        in_sidebar: false,
        icon: "",
    },
    RouteRule {
        destination: Destination::Preferences,
        path: "/preferences",
        access: Access::Public,
        in_sidebar: false,
        icon: "",
    },
    RouteRule {
        destination: Destination::Dashboard,
        path: "/dashboard",
        access: ANY_SIGNED_IN,
        in_sidebar: true,
        icon: "▦",
    },
    RouteRule {
        destination: Destination::Products,
        path: "/products",
        access: Access::Roles(&[Role::Admin, Role::Assistant]),
        in_sidebar: true,
        icon: "▣",
    },
    RouteRule {
        destination: Destination::Sales,
        path: "/sales",
        access: Access::Roles(&[Role::Admin, Role::Assistant, Role::Cashier]),
        in_sidebar: true,
        icon: "$",
    },
    RouteRule {
        destination: Destination::Analytics,
        path: "/analytics",
        access: Access::Roles(&[Role::Admin, Role::Assistant]),
        in_sidebar: true,
        icon: "▲",
    },
    RouteRule {
        destination: Destination::Users,
        path: "/users",
        access: Access::Roles(&[Role::Admin]),
        in_sidebar: true,
        icon: "☺",
    },
    RouteRule {
        destination: Destination::Settings,
        path: "/settings",
        access: Access::Roles(&[Role::Admin]),
        in_sidebar: true,
        icon: "⚙",
    },
    RouteRule {
        destination: Destination::Assistant,
        path: "/assistant",
        access: ANY_SIGNED_IN,
        in_sidebar: true,
        icon: "✦",
    },
];

impl Default for DestinationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DestinationRegistry {
    /// The console's destination table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: &STANDARD_RULES,
        }
    }

    /// Every rule, in sidebar order.
    #[must_use]
    pub const fn rules(&self) -> &'static [RouteRule] {
        self.rules
    }

    /// Find the rule governing `path` (query string and `/api` prefix ignored).
    #[must_use]
    pub fn rule_for(&self, path: &str) -> Option<&'static RouteRule> {
        let segment = first_segment(path)?;
        self.rules
            .iter()
            .find(|rule| rule.path.strip_prefix('/') == Some(segment))
    }

    /// Rule for a destination.
    #[must_use]
    pub fn rule_of(&self, destination: Destination) -> Option<&'static RouteRule> {
        self.rules.iter().find(|rule| rule.destination == destination)
    }

    /// Decide what a request for `path` should show to `identity`.
    ///
    /// This does not touch any session; see
    /// [`SessionHandle::navigate`](crate::services::auth::SessionHandle::navigate)
    /// for the variant that remembers the return path.
    #[must_use]
    pub fn resolve(&self, path: &str, identity: Option<&Identity>) -> Resolution {
        if first_segment(path).is_none() {
            return match identity {
                Some(_) => Resolution::Redirect(HOME_PATH),
                None => Resolution::Login { return_to: None },
            };
        }

        let Some(rule) = self.rule_for(path) else {
            return Resolution::NotFound;
        };

        match (rule.access, identity) {
            (Access::Public, Some(_)) if rule.destination == Destination::Login => {
                Resolution::Redirect(HOME_PATH)
            }
            (Access::Public, _) => Resolution::Render(rule.destination),
            (Access::Roles(_), None) => Resolution::Login {
                return_to: is_local_path(path).then(|| path.to_string()),
            },
            (Access::Roles(roles), Some(identity)) => {
                if is_authorized(Some(identity), roles) {
                    Resolution::Render(rule.destination)
                } else {
                    Resolution::Forbidden {
                        destination: rule.destination,
                    }
                }
            }
        }
    }

    /// Sidebar entries visible to `identity`.
    #[must_use]
    pub fn sidebar(&self, identity: Option<&Identity>) -> Vec<&'static RouteRule> {
        self.rules
            .iter()
            .filter(|rule| rule.in_sidebar)
            .filter(|rule| match rule.access {
                Access::Public => true,
                Access::Roles(roles) => is_authorized(identity, roles),
            })
            .collect()
    }

    /// Whether `identity` may view `destination`.
    #[must_use]
    pub fn allows(&self, identity: Option<&Identity>, destination: Destination) -> bool {
        self.rule_of(destination).is_some_and(|rule| match rule.access {
            Access::Public => true,
            Access::Roles(roles) => is_authorized(identity, roles),
        })
    }
}

/// True iff `identity` is present and its role is in `required`.
///
/// An empty `required` set admits any present identity.
#[must_use]
pub fn is_authorized(identity: Option<&Identity>, required: &[Role]) -> bool {
    identity.is_some_and(|identity| required.is_empty() || required.contains(&identity.role))
}

/// A path that stays on this site: one leading slash, no scheme-relative
/// `//`, no backslashes.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// First segment of the route part of `path`, without `/api`.
fn first_segment(path: &str) -> Option<&str> {
    let route = path.split(['?', '#']).next().unwrap_or_default();
    let route = route
        .strip_prefix("/api")
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(route);
    route
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use stockroom_core::{Email, UserId};

    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new(1),
            email: Email::parse("someone@inventory.com").unwrap(),
            name: "Someone".to_string(),
            role,
            avatar: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_is_authorized_membership() {
        let required = [Role::Admin, Role::Assistant];
        for role in Role::ALL {
            let expected = required.contains(&role);
            assert_eq!(is_authorized(Some(&identity(role)), &required), expected);
        }
    }

    #[test]
    fn test_is_authorized_absent_identity() {
        assert!(!is_authorized(None, &[]));
        assert!(!is_authorized(None, &Role::ALL));
    }

    #[test]
    fn test_is_authorized_empty_set_admits_everyone_signed_in() {
        for role in Role::ALL {
            assert!(is_authorized(Some(&identity(role)), &[]));
        }
    }

    #[test]
    fn test_anonymous_is_sent_to_login_with_return_path() {
        let registry = DestinationRegistry::standard();
        assert_eq!(
            registry.resolve("/products?q=mug", None),
            Resolution::Login {
                return_to: Some("/products?q=mug".to_string())
            }
        );
    }

    #[test]
    fn test_role_table() {
        let registry = DestinationRegistry::standard();
        let cashier = identity(Role::Cashier);
        let assistant = identity(Role::Assistant);
        let admin = identity(Role::Admin);

        assert_eq!(
            registry.resolve("/sales", Some(&cashier)),
            Resolution::Render(Destination::Sales)
        );
        assert_eq!(
            registry.resolve("/products", Some(&cashier)),
            Resolution::Forbidden {
                destination: Destination::Products
            }
        );
        assert_eq!(
            registry.resolve("/users", Some(&assistant)),
            Resolution::Forbidden {
                destination: Destination::Users
            }
        );
        assert_eq!(
            registry.resolve("/settings", Some(&admin)),
            Resolution::Render(Destination::Settings)
        );
        assert_eq!(
            registry.resolve("/assistant", Some(&cashier)),
            Resolution::Render(Destination::Assistant)
        );
    }

    #[test]
    fn test_sub_paths_and_api_prefix_follow_first_segment() {
        let registry = DestinationRegistry::standard();
        let cashier = identity(Role::Cashier);
        assert_eq!(
            registry.resolve("/products/3/delete", Some(&cashier)),
            Resolution::Forbidden {
                destination: Destination::Products
            }
        );
        assert_eq!(
            registry.resolve("/api/assistant/messages", Some(&cashier)),
            Resolution::Render(Destination::Assistant)
        );
    }

    #[test]
    fn test_root_and_login_redirect_when_signed_in() {
        let registry = DestinationRegistry::standard();
        let admin = identity(Role::Admin);
        assert_eq!(
            registry.resolve("/", Some(&admin)),
            Resolution::Redirect(HOME_PATH)
        );
        assert_eq!(
            registry.resolve("/login", Some(&admin)),
            Resolution::Redirect(HOME_PATH)
        );
        assert_eq!(
            registry.resolve("/login", None),
            Resolution::Render(Destination::Login)
        );
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let registry = DestinationRegistry::standard();
        assert_eq!(registry.resolve("/nope", None), Resolution::NotFound);
        assert_eq!(registry.resolve("/productsx", None), Resolution::NotFound);
    }

    #[test]
    fn test_sidebar_filters_by_role() {
        let registry = DestinationRegistry::standard();
        let labels = |role| {
            registry
                .sidebar(Some(&identity(role)))
                .iter()
                .map(|rule| rule.destination)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            labels(Role::Cashier),
            vec![
                Destination::Dashboard,
                Destination::Sales,
                Destination::Assistant
            ]
        );
        assert_eq!(labels(Role::Admin).len(), 7);
        assert!(registry.sidebar(None).is_empty());
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/products?q=a"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("/\\evil.example"));
    }
}
