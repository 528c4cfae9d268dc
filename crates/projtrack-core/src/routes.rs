//! Route classification and the per-navigation access guard.
//!
//! Public routes are `/login`, `/register` and `/about`. Everything else,
//! the root `/` included, needs a session.

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const ABOUT: &str = "/about";
pub const DASHBOARD: &str = "/dashboard";
pub const PROJECTS: &str = "/dashboard/projects";
pub const TASKS: &str = "/dashboard/projects/tasks";

/// Paths reachable without a session, matched as path prefixes.
pub const PUBLIC_ROUTES: [&str; 3] = [LOGIN, REGISTER, ABOUT];

/// Outcome of evaluating the guard for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Drop a trailing slash and any query or fragment (`/login/?next=x` -> `/login`)
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => HOME,
        trimmed => trimmed,
    }
}

/// Segment-aware prefix match: `/about` covers `/about/team` but not `/aboutx`
fn matches_route(path: &str, route: &str) -> bool {
    path == route
        || path
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether `path` names exactly `route`, ignoring a trailing slash or query
pub fn is_route(path: &str, route: &str) -> bool {
    normalize(path) == route
}

pub fn is_public(path: &str) -> bool {
    let path = normalize(path);
    PUBLIC_ROUTES.iter().any(|route| matches_route(path, route))
}

/// Decide whether a navigation to `path` proceeds.
///
/// | public | session | result |
/// |---|---|---|
/// | yes | yes, path is login/register | redirect to dashboard |
/// | yes | no | allow |
/// | yes | yes, other public path | allow |
/// | no | yes | allow |
/// | no | no | redirect to login |
pub fn guard(path: &str, session_present: bool) -> GuardDecision {
    let path = normalize(path);

    if session_present && (path == LOGIN || path == REGISTER) {
        return GuardDecision::Redirect(DASHBOARD);
    }
    if !session_present && !is_public(path) {
        return GuardDecision::Redirect(LOGIN);
    }
    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        // public, session, login/register
        assert_eq!(guard("/login", true), GuardDecision::Redirect(DASHBOARD));
        assert_eq!(guard("/register", true), GuardDecision::Redirect(DASHBOARD));
        // public, no session
        assert_eq!(guard("/login", false), GuardDecision::Allow);
        assert_eq!(guard("/register", false), GuardDecision::Allow);
        assert_eq!(guard("/about", false), GuardDecision::Allow);
        // public, session, other public path
        assert_eq!(guard("/about", true), GuardDecision::Allow);
        // protected, session
        assert_eq!(guard("/dashboard", true), GuardDecision::Allow);
        assert_eq!(guard("/dashboard/projects", true), GuardDecision::Allow);
        // protected, no session
        assert_eq!(guard("/dashboard", false), GuardDecision::Redirect(LOGIN));
        assert_eq!(guard(TASKS, false), GuardDecision::Redirect(LOGIN));
    }

    #[test]
    fn test_root_is_protected() {
        assert!(!is_public("/"));
        assert_eq!(guard("/", false), GuardDecision::Redirect(LOGIN));
        assert_eq!(guard("", false), GuardDecision::Redirect(LOGIN));
        assert_eq!(guard("/", true), GuardDecision::Allow);
    }

    #[test]
    fn test_prefix_matching_respects_segments() {
        assert!(is_public("/about/team"));
        assert!(!is_public("/aboutx"));
        assert!(!is_public("/loginhelp"));
        assert_eq!(guard("/loginhelp", false), GuardDecision::Redirect(LOGIN));
        // Sub-paths of login are public but do not bounce signed-in users
        assert_eq!(guard("/login/reset", true), GuardDecision::Allow);
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        assert_eq!(guard("/login/", true), GuardDecision::Redirect(DASHBOARD));
        assert_eq!(guard("/login?next=/dashboard", true), GuardDecision::Redirect(DASHBOARD));
        assert_eq!(guard("/dashboard/", false), GuardDecision::Redirect(LOGIN));
        assert_eq!(guard("/about#team", false), GuardDecision::Allow);
    }

    #[test]
    fn test_guard_is_idempotent() {
        for path in ["/", "/login", "/register", "/about", "/dashboard", PROJECTS] {
            for session in [true, false] {
                assert_eq!(guard(path, session), guard(path, session));
            }
        }
    }

    #[test]
    fn test_is_route() {
        assert!(is_route("/login", LOGIN));
        assert!(is_route("/login/", LOGIN));
        assert!(!is_route("/login/reset", LOGIN));
        assert!(is_route("", HOME));
    }

    #[test]
    fn test_is_allowed() {
        assert!(GuardDecision::Allow.is_allowed());
        assert!(!GuardDecision::Redirect(LOGIN).is_allowed());
    }
}
