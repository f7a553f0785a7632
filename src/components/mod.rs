//! UI Components
//!
//! Reusable Leptos components.

mod counter_list;
mod counter_row;
mod display_mode_selector;
mod remove_counter_button;

pub use counter_list::CounterList;
pub use counter_row::CounterRow;
pub use display_mode_selector::DisplayModeSelector;
pub use remove_counter_button::RemoveCounterButton;
