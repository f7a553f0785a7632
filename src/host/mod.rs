//! Host Bindings
//!
//! The shared item store and player/menu surface of the VTT host,
//! organized as a trait so panel logic runs against the live SDK in the
//! browser and an in-memory store in tests.

mod obr;

#[cfg(test)]
pub mod fake;

pub use obr::{
    get_role, get_selection, on_player_change, on_ready, register_context_menu, ContextMenuFilter,
    ContextMenuIcon, KeyFilter, ObrStore,
};

use crate::metadata;
use crate::models::Item;

/// The host's shared, broadcast item store.
///
/// `update_items` is the atomic read-modify-write primitive: the mutation
/// closure runs against the live item and the host commits and broadcasts
/// the diff. References held before a call are stale afterwards; callers
/// must re-fetch through `items` before reading dependent state.
pub trait ItemStore {
    /// Snapshot of every item on the scene.
    async fn items(&self) -> Result<Vec<Item>, String>;

    async fn add_items(&self, items: Vec<Item>) -> Result<(), String>;

    async fn update_items<F>(&self, targets: &[Item], mutate: F) -> Result<(), String>
    where
        F: Fn(&mut Item) + 'static;

    async fn delete_items(&self, ids: &[String]) -> Result<(), String>;

    /// Grid resolution of the live scene.
    async fn grid_dpi(&self) -> Result<f64, String>;
}

/// Console one-liner prefixed with the plugin id.
pub fn log(message: &str) {
    web_sys::console::log_1(&format!("{}: {message}", metadata::PLUGIN_ID).into());
}
