//! Multi-tab view session module.
//!
//! This module tracks which logical views are open, which one is active,
//! and which are eligible for fast-switch caching:
//!
//! - `ViewTab` / `ViewDescriptor`: the tab and the navigation event it
//!   comes from
//! - `ViewSession`: the aggregate state and its transitions
//!
//! The state lives for the process lifetime and is reset, never destroyed.

pub mod session;
pub mod tab;

pub use session::ViewSession;
pub use tab::{ViewDescriptor, ViewTab};
