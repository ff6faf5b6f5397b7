//! Header and sidebar state derived from the session, cart and path.

use pos_auth::{Role, Session};

/// Paths that keep the cart sidebar open.
const CART_SIDEBAR_PATHS: &[&str] = &[
    "/admin/pos",
    "/marketplace",
    "/services",
    "/admin/inventory",
    "/customer",
];

/// What the navigation chrome shows.
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    pub signed_in: bool,
    /// "Login" or "Logout".
    pub auth_label: &'static str,
    pub initials: Option<String>,
    pub display_name: Option<String>,
    pub show_admin_links: bool,
    pub show_create_company: bool,
    /// Cart badge text; `None` hides the badge.
    pub cart_badge: Option<String>,
}

impl NavState {
    pub fn from_session(session: Option<&Session>, cart_count: f64) -> Self {
        let role = session.map(|s| s.role);
        Self {
            signed_in: session.is_some(),
            auth_label: if session.is_some() { "Logout" } else { "Login" },
            initials: session.map(Session::initials),
            display_name: session.map(Session::display_name),
            show_admin_links: role.is_some_and(|r| r != Role::Customer),
            show_create_company: role.is_some_and(|r| r.is_superadmin()),
            cart_badge: badge(cart_count),
        }
    }
}

impl Default for NavState {
    fn default() -> Self {
        Self::from_session(None, 0.0)
    }
}

fn badge(count: f64) -> Option<String> {
    if !count.is_finite() || count <= 0.0 {
        return None;
    }
    if count.fract() == 0.0 {
        Some(format!("{count:.0}"))
    } else {
        Some(count.to_string())
    }
}

/// Whether the cart sidebar stays open on `path`.
pub fn keeps_cart_sidebar(path: &str) -> bool {
    CART_SIDEBAR_PATHS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(path))
}

/// Whether the link to `href` is highlighted on `path`. Every link but the
/// dashboard also lights up on its sub-paths.
pub fn is_active_link(path: &str, href: &str) -> bool {
    if path == href {
        return true;
    }
    href != "/dashboard" && !href.is_empty() && path.starts_with(href)
}

/// Landing page for the signed-in user's role.
pub fn dashboard_path(session: Option<&Session>) -> &'static str {
    match session.map(|s| s.role) {
        None => "/dashboard",
        Some(Role::SuperAdmin) => "/superadmin",
        Some(Role::Owner) => "/owner",
        Some(Role::President) => "/president",
        Some(Role::Manager) => "/manager",
        Some(Role::Supervisor) => "/supervisor",
        Some(Role::Staff) => "/staff",
        Some(Role::Customer) => "/customer",
    }
}
