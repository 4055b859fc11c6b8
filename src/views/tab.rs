//! View tab types.

use serde::{Deserialize, Serialize};

/// One open logical view in the tab strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTab {
    /// Unique key of the tab.
    pub path: String,
    /// Stable identifier for the view type, used as the fast-switch cache key.
    pub name: String,
    /// Display title.
    pub title: String,
    pub closable: bool,
}

/// Navigation event describing a view the router resolved.
///
/// Capability flags travel with the event so the session manager never has
/// to compare literal path strings: `participates_in_tabs` replaces the
/// hidden-route check, `closable` replaces the home-path check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub path: String,
    pub name: String,
    pub title: String,
    /// Detail views reached by id stay out of the tab strip entirely.
    pub participates_in_tabs: bool,
    pub closable: bool,
}

impl ViewDescriptor {
    /// Ordinary closable view.
    pub fn view(
        path: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            title: title.into(),
            participates_in_tabs: true,
            closable: true,
        }
    }

    /// Permanently pinned view (the home tab).
    pub fn pinned(
        path: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            closable: false,
            ..Self::view(path, name, title)
        }
    }

    /// View that never participates in the tab strip.
    pub fn hidden(
        path: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            participates_in_tabs: false,
            ..Self::view(path, name, title)
        }
    }

    pub(crate) fn to_tab(&self) -> ViewTab {
        ViewTab {
            path: self.path.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            closable: self.closable,
        }
    }
}
