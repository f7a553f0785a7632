//! Counter List Component
//!
//! Renders one row per counter of the selected token. The list is rebuilt
//! from the panel store on every reload, mirroring how the metadata is the
//! single source of truth.

use leptos::prelude::*;

use crate::components::CounterRow;
use crate::store::{use_panel_store, PanelStateStoreFields};

#[component]
pub fn CounterList() -> impl IntoView {
    let store = use_panel_store();

    view! {
        <div class="counters">
            {move || {
                store
                    .counters()
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(index, counter)| view! { <CounterRow index=index counter=counter /> })
                    .collect_view()
            }}
        </div>
    }
}
