//! Counter Row Component
//!
//! One counter's controls: value, maximum, quick-modify, and a settings
//! drawer with label editing, display mode, colour, and removal. Every
//! edit goes through the counter store adapter and then reloads the panel
//! from the host, so the row always reflects committed metadata.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{DisplayModeSelector, RemoveCounterButton};
use crate::context::AppContext;
use crate::counters;
use crate::host::{self, ObrStore};
use crate::models::{Counter, ShowAs};
use crate::store::{use_panel_store, PanelStateStoreFields};

#[component]
pub fn CounterRow(index: usize, counter: Counter) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_panel_store();

    let (show_settings, set_show_settings) = signal(false);
    let (modify_text, set_modify_text) = signal(String::new());

    let value = counter.value;
    let max_value = counter.max_value;
    let show_as = counter.show_as;
    let label = counter.label.clone();
    let colour = counter.colour.clone();

    let on_value_change = move |ev| {
        let Ok(value) = event_target_value(&ev).parse::<f64>() else {
            // Reject malformed input and re-sync the field from metadata.
            ctx.reload();
            return;
        };
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::set_value(&ObrStore, &token, index, value).await {
                host::log(&format!("value update failed: {error}"));
            }
            ctx.reload();
        });
    };

    let on_max_change = move |ev| {
        let Ok(max_value) = event_target_value(&ev).parse::<f64>() else {
            ctx.reload();
            return;
        };
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::set_max_value(&ObrStore, &token, index, max_value).await {
                host::log(&format!("maximum update failed: {error}"));
            }
            ctx.reload();
        });
    };

    let on_modify_change = move |ev| {
        let input = event_target_value(&ev);
        // The quick-modify field is one-shot: it clears whether or not the
        // input parsed, and rejected input mutates nothing.
        set_modify_text.set(String::new());
        let Some(delta) = counters::parse_modify(&input) else {
            return;
        };
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::modify_value(&ObrStore, &token, index, delta).await {
                host::log(&format!("modify failed: {error}"));
            }
            ctx.reload();
        });
    };

    let label_for_prompt = counter.label.clone();
    let on_edit_label = move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(entered) =
            window.prompt_with_message_and_default("Enter label for counter:", &label_for_prompt)
        else {
            return;
        };
        let Some(entered) = entered else {
            return;
        };
        if entered == label_for_prompt {
            return;
        }
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::set_label(&ObrStore, &token, index, entered).await {
                host::log(&format!("label update failed: {error}"));
            }
            ctx.reload();
        });
    };

    let on_mode_change = move |mode: ShowAs| {
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::set_show_as(&ObrStore, &token, index, mode).await {
                host::log(&format!("display mode change failed: {error}"));
            }
            ctx.reload();
        });
    };

    let on_colour_change = move |ev| {
        let colour = event_target_value(&ev);
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            if let Err(error) = counters::set_colour(&ObrStore, &token, index, colour).await {
                host::log(&format!("colour update failed: {error}"));
            }
            ctx.reload();
        });
    };

    let on_remove = Callback::new(move |_: ()| {
        let Some(token) = store.token().get() else {
            return;
        };
        spawn_local(async move {
            match counters::remove_counter(&ObrStore, &token, index).await {
                Ok(_) => host::log(&format!(
                    "removed counter {index} from token {} (\"{}\")",
                    token.id, token.name
                )),
                Err(error) => host::log(&format!("remove failed: {error}")),
            }
            ctx.reload();
        });
    });

    let has_label = !label.is_empty();

    view! {
        <div class="counter">
            <Show when=move || has_label>
                <span class="counter-label">{label.clone()}</span>
            </Show>

            <div class="counter-values">
                <input class="value" type="number" prop:value=value.to_string() on:change=on_value_change />
                <span class="separator">"/"</span>
                <input class="max-value" type="number" prop:value=max_value.to_string() on:change=on_max_change />
                <input
                    class="modify"
                    type="text"
                    placeholder="+/-"
                    prop:value=move || modify_text.get()
                    on:input=move |ev| set_modify_text.set(event_target_value(&ev))
                    on:change=on_modify_change
                />
                <button
                    class=move || if show_settings.get() { "show-settings selected" } else { "show-settings" }
                    on:click=move |_| set_show_settings.update(|shown| *shown = !*shown)
                >
                    "⚙"
                </button>
            </div>

            <Show when=move || show_settings.get()>
                <div class="settings">
                    <button class="edit-label" on:click=on_edit_label.clone()>"Label"</button>
                    <DisplayModeSelector current=show_as on_change=on_mode_change />
                    <input class="colour" type="color" prop:value=colour.clone() on:change=on_colour_change />
                    <RemoveCounterButton on_confirm=on_remove />
                </div>
            </Show>
        </div>
    }
}
