//! Token Counter Panel App
//!
//! Root component: wires host readiness and selection changes into the
//! panel store and renders the three panel pages.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::CounterList;
use crate::context::AppContext;
use crate::counters;
use crate::dead_marker;
use crate::host::{self, ObrStore};
use crate::metadata;
use crate::models::PlayerRole;
use crate::store::{store_apply_view, Page, PanelState, PanelStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let (selection, set_selection) = signal::<Option<Vec<String>>>(None);
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (ready, set_ready) = signal(false);
    let store = Store::new(PanelState::default());
    let ctx = AppContext::new((selection, set_selection), (reload_trigger, set_reload_trigger));

    provide_context(store);
    provide_context(ctx);

    // One-time host wiring once the host reports ready: seed the selection,
    // follow later selection changes, register the dead-marker menu.
    Effect::new(move |_| {
        host::on_ready(move || {
            set_ready.set(true);
            host::on_player_change(move |player| ctx.set_selection(player.selection));
            spawn_local(async move {
                if let Ok(current) = host::get_selection().await {
                    ctx.set_selection(current);
                }
                if let Err(error) = dead_marker::register_menu().await {
                    host::log(&format!("context menu registration failed: {error}"));
                }
            });
        });
    });

    // Reload the panel whenever the selection or the reload trigger changes.
    // Nothing to ask the host for before it reports ready.
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let selection = selection.get();
        if !ready.get() {
            return;
        }
        spawn_local(async move {
            let role = host::get_role().await.unwrap_or(PlayerRole::Player);
            match counters::load_panel(&ObrStore, role, selection).await {
                Ok(view) => store_apply_view(&store, role == PlayerRole::Gm, view),
                Err(error) => host::log(&format!("panel reload failed: {error}")),
            }
        });
    });

    let on_add_counter = move |_| {
        let Some(token) = store.token().get() else {
            return;
        };
        // Access can have been revoked since the panel loaded.
        if !store.is_gm().get() && metadata::is_gm_only(&token) {
            return;
        }
        spawn_local(async move {
            match counters::add_counter(&ObrStore, &token).await {
                Ok(Some(updated)) => host::log(&format!(
                    "added counter to token {} (\"{}\")",
                    updated.id, updated.name
                )),
                Ok(None) => {}
                Err(error) => host::log(&format!("add counter failed: {error}")),
            }
            ctx.reload();
        });
    };

    let on_toggle_gm_only = move |_| {
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::toggle_gm_only(&ObrStore, &token).await {
                host::log(&format!("gm-only toggle failed: {error}"));
            }
            ctx.reload();
        });
    };

    view! {
        <main class="panel">
            {move || match store.page().get() {
                Page::NoToken => view! {
                    <p class="placeholder">"Select a character to manage its counters."</p>
                }
                .into_any(),
                Page::Restricted => view! {
                    <p class="placeholder">"Nothing to see here."</p>
                }
                .into_any(),
                Page::Controls => view! {
                    <div class="controls">
                        <div class="controls-header">
                            <button class="add-counter" on:click=on_add_counter>"Add counter"</button>
                            <Show when=move || store.is_gm().get()>
                                <button
                                    class=move || if store.gm_only().get() { "gm-only selected" } else { "gm-only" }
                                    on:click=on_toggle_gm_only
                                >
                                    "GM only"
                                </button>
                            </Show>
                        </div>
                        <CounterList />
                    </div>
                }
                .into_any(),
            }}
        </main>
    }
}
