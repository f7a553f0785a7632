//! Panel State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::counters::PanelView;
use crate::models::{Counter, Item};

/// Which page of the side panel is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Page {
    #[default]
    NoToken,
    Restricted,
    Controls,
}

/// Panel state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct PanelState {
    pub page: Page,
    /// The managed token backing the controls page.
    pub token: Option<Item>,
    /// Its counters, in metadata order.
    pub counters: Vec<Counter>,
    pub gm_only: bool,
    pub is_gm: bool,
}

/// Type alias for the store
pub type PanelStore = Store<PanelState>;

/// Get the panel store from context
pub fn use_panel_store() -> PanelStore {
    expect_context::<PanelStore>()
}

/// Replace the panel snapshot after a reload from the host.
pub fn store_apply_view(store: &PanelStore, is_gm: bool, view: PanelView) {
    *store.is_gm().write() = is_gm;
    match view {
        PanelView::NoToken => {
            *store.page().write() = Page::NoToken;
            *store.token().write() = None;
            store.counters().write().clear();
        }
        PanelView::Restricted => {
            *store.page().write() = Page::Restricted;
            *store.token().write() = None;
            store.counters().write().clear();
        }
        PanelView::Controls {
            token,
            counters,
            gm_only,
        } => {
            *store.page().write() = Page::Controls;
            *store.token().write() = Some(token);
            *store.counters().write() = counters;
            *store.gm_only().write() = gm_only;
        }
    }
}
