//! Static route table for the admin panel.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Only reachable with an authenticated session.
    pub requires_auth: bool,
    /// Only meaningful for signed-out users (login).
    pub guest: bool,
}

impl RouteMeta {
    pub const GUEST: Self = Self {
        requires_auth: false,
        guest: true,
    };
    pub const PROTECTED: Self = Self {
        requires_auth: true,
        guest: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub meta: RouteMeta,
}

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

/// Children of the protected layout inherit `requires_auth`.
pub const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_ROUTE,
        name: "Login",
        meta: RouteMeta::GUEST,
    },
    Route {
        path: HOME_ROUTE,
        name: "Dashboard",
        meta: RouteMeta::PROTECTED,
    },
    Route {
        path: "/categories",
        name: "Categories",
        meta: RouteMeta::PROTECTED,
    },
    Route {
        path: "/items",
        name: "Items",
        meta: RouteMeta::PROTECTED,
    },
    Route {
        path: "/lending",
        name: "Lending",
        meta: RouteMeta::PROTECTED,
    },
    Route {
        path: "/settings",
        name: "Settings",
        meta: RouteMeta::PROTECTED,
    },
];

pub const NOT_FOUND: Route = Route {
    path: "",
    name: "NotFound",
    meta: RouteMeta {
        requires_auth: false,
        guest: false,
    },
};

/// Normalizes a path: drops query/fragment, ensures a leading slash and
/// strips trailing slashes.
#[must_use]
pub fn normalize(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

/// Finds the route for `path`, falling back to `NOT_FOUND`.
#[must_use]
pub fn resolve(path: &str) -> Route {
    let normalized = normalize(path);
    ROUTES
        .iter()
        .find(|route| route.path == normalized)
        .copied()
        .unwrap_or(NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::{NOT_FOUND, RouteMeta, normalize, resolve};

    #[test]
    fn normalize_strips_noise() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("items/"), "/items");
        assert_eq!(normalize("/items?page=2#top"), "/items");
        assert_eq!(normalize("//settings//"), "/settings");
    }

    #[test]
    fn resolve_matches_known_routes() {
        assert_eq!(resolve("/login").meta, RouteMeta::GUEST);
        assert_eq!(resolve("/").name, "Dashboard");
        assert!(resolve("/items/").meta.requires_auth);
        assert_eq!(resolve("/nowhere"), NOT_FOUND);
    }
}
