//! Display Mode Selector Component
//!
//! Buttons switching a counter between hidden, number, and bar display.

use leptos::prelude::*;

use crate::models::ShowAs;

/// Display mode options
const DISPLAY_MODES: &[(ShowAs, &str)] = &[
    (ShowAs::Hidden, "Hide"),
    (ShowAs::Number, "Number"),
    (ShowAs::Bar, "Bar"),
];

/// Mode selector buttons for a counter
#[component]
pub fn DisplayModeSelector(
    current: ShowAs,
    on_change: impl Fn(ShowAs) + Copy + 'static,
) -> impl IntoView {
    view! {
        <div class="display-mode-selector">
            {DISPLAY_MODES.iter().map(|(mode, label)| {
                let mode = *mode;
                view! {
                    <button
                        class=move || if current == mode { "mode-btn active" } else { "mode-btn" }
                        on:click=move |_| on_change(mode)
                    >
                        {*label}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
