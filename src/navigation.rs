//! Navigation targets reported back to the caller after an operation.

use std::fmt;

/// A view the front end can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Menu browsing
    Menu,
    /// Order placement
    Checkout,
    /// Order status list
    Orders,
    /// Sign-in, handled outside this crate
    Auth,
}

impl Route {
    /// URL path of the view
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Menu => "/",
            Self::Checkout => "/checkout",
            Self::Orders => "/orders",
            Self::Auth => "/auth",
        }
    }

    /// Resolves a path back to a route
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Menu),
            "/checkout" => Some(Self::Checkout),
            "/orders" => Some(Self::Orders),
            "/auth" => Some(Self::Auth),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_back() {
        for route in [Route::Menu, Route::Checkout, Route::Orders, Route::Auth] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/orders/"), Some(Route::Orders));
        assert_eq!(Route::from_path("/admin"), None);
    }
}
