//! Route table and navigation guard.
//!
//! Pages are gated on one bit of state: whether the session holds a token.
//! Before every navigation the guard decides:
//! 1. protected page while anonymous: go to `/login`
//! 2. `/login` or `/register` while authenticated: go to `/`
//! 3. anything else: allowed

use crate::client::navigation::Navigator;
use crate::client::session::Session;
use std::rc::Rc;

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Path of the registration page.
pub const REGISTER_PATH: &str = "/register";

/// Path of the landing page for authenticated users.
pub const HOME_PATH: &str = "/";

/// Pages of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Login,
    Register,
    MyAnimals,
    AnimalDetails,
    DogSitters,
    Bookings,
    Profile,
}

/// One entry of the route table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDef {
    /// Path pattern; `:name` segments match any single segment.
    pub path: &'static str,
    pub page: Page,
    pub requires_auth: bool,
}

/// The application's routes.
pub const ROUTES: &[RouteDef] = &[
    RouteDef {
        path: HOME_PATH,
        page: Page::Home,
        requires_auth: true,
    },
    RouteDef {
        path: LOGIN_PATH,
        page: Page::Login,
        requires_auth: false,
    },
    RouteDef {
        path: REGISTER_PATH,
        page: Page::Register,
        requires_auth: false,
    },
    RouteDef {
        path: "/my-animals",
        page: Page::MyAnimals,
        requires_auth: true,
    },
    // Pet details have never been gated; the list page is.
    RouteDef {
        path: "/my-animals/:id",
        page: Page::AnimalDetails,
        requires_auth: false,
    },
    RouteDef {
        path: "/dogsitters",
        page: Page::DogSitters,
        requires_auth: true,
    },
    RouteDef {
        path: "/bookings",
        page: Page::Bookings,
        requires_auth: true,
    },
    RouteDef {
        path: "/profile",
        page: Page::Profile,
        requires_auth: true,
    },
];

/// A path matched against the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub page: Page,
    /// Normalized path that was matched
    pub path: String,
    pub requires_auth: bool,
    /// Values captured by `:name` segments, in pattern order
    pub params: Vec<(String, String)>,
}

impl ResolvedRoute {
    /// Value of the `:name` segment, if the pattern has one.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of the navigation guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(&'static str),
}

/// Decides whether navigation to `path` may proceed.
///
/// # Example
///
/// ```
/// # use dogsitter_client::client::router::{guard, Navigation};
/// assert_eq!(guard("/bookings", true, false), Navigation::Redirect("/login"));
/// assert_eq!(guard("/login", false, true), Navigation::Redirect("/"));
/// assert_eq!(guard("/login", false, false), Navigation::Allow);
/// ```
pub fn guard(path: &str, requires_auth: bool, is_authenticated: bool) -> Navigation {
    if requires_auth && !is_authenticated {
        Navigation::Redirect(LOGIN_PATH)
    } else if (path == LOGIN_PATH || path == REGISTER_PATH) && is_authenticated {
        Navigation::Redirect(HOME_PATH)
    } else {
        Navigation::Allow
    }
}

/// Strips query and fragment and the trailing slash; empty becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        HOME_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Static route lookup.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES.to_vec())
    }
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    /// Matches `path` against the table; first match wins.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let path = normalize_path(path);
        let segments: Vec<&str> = split_segments(&path);

        self.routes.iter().find_map(|route| {
            let params = match_pattern(route.path, &segments)?;
            Some(ResolvedRoute {
                page: route.page,
                path: path.clone(),
                requires_auth: route.requires_auth,
                params,
            })
        })
    }

    /// Evaluates the guard for `path`. Unknown paths are not protected.
    pub fn check(&self, path: &str, is_authenticated: bool) -> Navigation {
        let normalized = normalize_path(path);
        let requires_auth = self
            .resolve(&normalized)
            .is_some_and(|route| route.requires_auth);
        guard(&normalized, requires_auth, is_authenticated)
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<Vec<(String, String)>> {
    let pattern_segments = split_segments(pattern);
    if pattern_segments.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_string(), (*actual).to_string()));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

/// Applies the guard against a live session and performs the navigation.
#[derive(Clone)]
pub struct Router {
    table: RouteTable,
    session: Session,
    navigator: Rc<dyn Navigator>,
}

/// Upper bound on guard redirects followed for one navigation.
const MAX_REDIRECTS: usize = 4;

impl Router {
    pub fn new(table: RouteTable, session: Session, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            table,
            session,
            navigator,
        }
    }

    /// Guard decision for `path` given the current session.
    pub fn check(&self, path: &str) -> Navigation {
        self.table.check(path, self.session.is_authenticated())
    }

    /// Navigates to `path`, following guard redirects.
    ///
    /// The navigator is invoked exactly once, with the final target.
    ///
    /// # Arguments
    ///
    /// * `path` - Requested path; query, fragment and trailing slash are ignored
    ///
    /// # Returns
    ///
    /// The route finally shown, or `None` when no route matches it.
    pub fn navigate(&self, path: &str) -> Option<ResolvedRoute> {
        let mut target = normalize_path(path);

        for _ in 0..MAX_REDIRECTS {
            match self.check(&target) {
                Navigation::Allow => break,
                Navigation::Redirect(next) => {
                    tracing::trace!("Guard redirected {} to {}", target, next);
                    if next == target {
                        break;
                    }
                    target = next.to_string();
                }
            }
        }

        self.navigator.navigate(&target);
        self.table.resolve(&target)
    }
}
