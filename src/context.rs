//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Latest selection reported by the host - read
    pub selection: ReadSignal<Option<Vec<String>>>,
    /// Latest selection reported by the host - write
    set_selection: WriteSignal<Option<Vec<String>>>,
    /// Trigger to reload the panel from the host - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the panel from the host - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(
        selection: (
            ReadSignal<Option<Vec<String>>>,
            WriteSignal<Option<Vec<String>>>,
        ),
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
    ) -> Self {
        Self {
            selection: selection.0,
            set_selection: selection.1,
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
        }
    }

    /// Trigger a reload of the panel from the host
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Record the host's current selection
    pub fn set_selection(&self, selection: Option<Vec<String>>) {
        self.set_selection.set(selection);
    }
}
