//! Multi-tab view session state.
//!
//! One aggregate state object tracks the open tabs, the active tab, and the
//! set of view names eligible for fast-switch caching. All transitions are
//! synchronous; closing operations hand a navigation instruction back to the
//! caller instead of navigating themselves.

use std::collections::BTreeSet;

use tracing::debug;

use super::tab::{ViewDescriptor, ViewTab};

/// Aggregate navigation state for the open views.
///
/// Seeded with a single permanent home tab. Held after every operation:
/// tab paths are pairwise unique, the home tab is present and non-closable,
/// and `cached_views` is exactly the set of logical names of the open tabs.
#[derive(Debug, Clone)]
pub struct ViewSession {
    home: ViewTab,
    tabs: Vec<ViewTab>,
    active_path: String,
    cached_views: BTreeSet<String>,
}

impl ViewSession {
    /// Seed the session with its permanent home view.
    pub fn new(home: ViewDescriptor) -> Self {
        let home = ViewTab {
            closable: false,
            ..home.to_tab()
        };
        let mut session = Self {
            active_path: home.path.clone(),
            tabs: vec![home.clone()],
            cached_views: BTreeSet::new(),
            home,
        };
        session.rebuild_cache();
        session
    }

    pub fn tabs(&self) -> &[ViewTab] {
        &self.tabs
    }

    pub fn active_path(&self) -> &str {
        &self.active_path
    }

    pub fn cached_views(&self) -> &BTreeSet<String> {
        &self.cached_views
    }

    pub fn home_path(&self) -> &str {
        &self.home.path
    }

    /// Record a navigation. Views not participating in the tab strip are
    /// ignored entirely; anything else gets a tab (appended on first visit),
    /// a cache entry, and becomes active.
    pub fn open(&mut self, view: &ViewDescriptor) {
        if !view.participates_in_tabs {
            return;
        }

        if !self.tabs.iter().any(|tab| tab.path == view.path) {
            debug!(path = %view.path, "Opening tab");
            self.tabs.push(view.to_tab());
        }
        if !view.name.is_empty() {
            self.cached_views.insert(view.name.clone());
        }
        self.active_path = view.path.clone();
    }

    /// Close the tab at `path`. Absent paths and non-closable tabs are
    /// silent no-ops. When the active tab is closed, the replacement at
    /// position `min(removed index, last index)` becomes active and its path
    /// is returned as a navigation instruction for the caller.
    pub fn close(&mut self, path: &str) -> Option<String> {
        let index = self.tabs.iter().position(|tab| tab.path == path)?;
        if !self.tabs[index].closable {
            return None;
        }

        let removed = self.tabs.remove(index);
        debug!(path = %removed.path, "Closed tab");
        if !self.tabs.iter().any(|tab| tab.name == removed.name) {
            self.cached_views.remove(&removed.name);
        }

        if self.active_path != path {
            return None;
        }

        // The home tab cannot be closed, so at least one tab remains here;
        // the empty branch is kept for totality only.
        let last = self.tabs.len().checked_sub(1)?;
        let replacement = self.tabs[index.min(last)].path.clone();
        self.active_path = replacement.clone();
        Some(replacement)
    }

    /// Close every closable tab except the one at `keep_path`, then activate
    /// `keep_path` unconditionally - the caller is responsible for passing a
    /// live path.
    pub fn close_others(&mut self, keep_path: &str) {
        self.tabs
            .retain(|tab| tab.path == keep_path || !tab.closable);
        self.rebuild_cache();
        self.active_path = keep_path.to_string();
    }

    /// Close every closable tab and return to the home view.
    pub fn close_all(&mut self) {
        self.tabs.retain(|tab| !tab.closable);
        self.rebuild_cache();
        self.active_path = self.home.path.clone();
    }

    /// Overwrite the active path with no existence check; callers `open()`
    /// new destinations first.
    pub fn set_active(&mut self, path: &str) {
        self.active_path = path.to_string();
    }

    /// Return to the seed state: the home tab alone, active, cached.
    pub fn reset(&mut self) {
        self.tabs = vec![self.home.clone()];
        self.active_path = self.home.path.clone();
        self.rebuild_cache();
    }

    fn rebuild_cache(&mut self) {
        self.cached_views = self
            .tabs
            .iter()
            .map(|tab| tab.name.clone())
            .filter(|name| !name.is_empty())
            .collect();
    }
}
