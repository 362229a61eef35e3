//! Logical screen paths and the {path x role} dispatch table.

use shared::domain::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutePath {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl RoutePath {
    pub const ALL: [RoutePath; 4] = [
        RoutePath::Login,
        RoutePath::Bills,
        RoutePath::NewBill,
        RoutePath::Dashboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoutePath::Login => "/",
            RoutePath::Bills => "#employee/bills",
            RoutePath::NewBill => "#employee/bill/new",
            RoutePath::Dashboard => "#admin/dashboard",
        }
    }

    /// Returns `None` for paths no view is registered under.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(RoutePath::Login);
        }
        Self::ALL.into_iter().find(|path| path.as_str() == raw)
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a resolved route needs beyond its static markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCapability {
    Static,
    BillsList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: RoutePath,
    /// `None` means the entry serves every role.
    pub role: Option<Role>,
    pub capability: ViewCapability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub path: RoutePath,
    pub capability: ViewCapability,
    pub fell_back: bool,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            RouteEntry {
                path: RoutePath::Login,
                role: None,
                capability: ViewCapability::Static,
            },
            RouteEntry {
                path: RoutePath::Bills,
                role: Some(Role::Employee),
                capability: ViewCapability::BillsList,
            },
            RouteEntry {
                path: RoutePath::NewBill,
                role: Some(Role::Employee),
                capability: ViewCapability::Static,
            },
            RouteEntry {
                path: RoutePath::Dashboard,
                role: Some(Role::Administrator),
                capability: ViewCapability::Static,
            },
        ])
    }
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, path: RoutePath, role: Role) -> Option<RouteEntry> {
        self.entries
            .iter()
            .copied()
            .find(|entry| entry.path == path && entry.role.map_or(true, |r| r == role))
    }

    /// Resolves `path` for `role`, falling back to the role's landing page when the
    /// path is unknown or not served for that role.
    pub fn resolve(&self, path: Option<RoutePath>, role: Role) -> Resolution {
        if let Some(entry) = path.and_then(|path| self.lookup(path, role)) {
            return Resolution {
                path: entry.path,
                capability: entry.capability,
                fell_back: false,
            };
        }

        let landing = landing_path(role);
        let capability = self
            .lookup(landing, role)
            .map_or(ViewCapability::Static, |entry| entry.capability);
        Resolution {
            path: landing,
            capability,
            fell_back: true,
        }
    }
}

pub fn landing_path(role: Role) -> RoutePath {
    match role {
        Role::Employee => RoutePath::Bills,
        Role::Administrator => RoutePath::Dashboard,
    }
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
