//! Counter Store Adapter
//!
//! Panel-facing operations over the counter slice of a token's metadata.
//! The metadata is the single source of truth; every operation here is one
//! sequential task that mutates it through the host's read-modify-write
//! primitive, re-fetches the token, and then lets the visualisation layer
//! re-derive whatever overlay state depends on it.

use std::slice;

use crate::host::ItemStore;
use crate::metadata;
use crate::models::{layer, Counter, Item, PlayerRole, ShowAs};
use crate::visualisation;

/// A scene item the panel is willing to manage: something on the character
/// or mount layer, or an already-dead token that was moved off them.
pub fn is_token(item: &Item) -> bool {
    item.layer == layer::CHARACTER || item.layer == layer::MOUNT || metadata::is_dead(item)
}

pub fn has_access(role: PlayerRole, token: &Item) -> bool {
    role == PlayerRole::Gm || !metadata::is_gm_only(token)
}

/// First selected item that qualifies as a token.
pub async fn find_token<S: ItemStore>(
    store: &S,
    selection: &[String],
) -> Result<Option<Item>, String> {
    let items = store.items().await?;
    Ok(items
        .into_iter()
        .find(|item| selection.contains(&item.id) && is_token(item)))
}

pub async fn fetch_token<S: ItemStore>(store: &S, id: &str) -> Result<Option<Item>, String> {
    Ok(store.items().await?.into_iter().find(|item| item.id == id))
}

/// Atomically rewrite a token's counters and return the re-fetched token.
///
/// The token reference passed in is stale once the host commits the patch,
/// so dependent reads must go through the returned item. `None` means the
/// token vanished under us (deleted by another client), a no-op for the
/// caller.
pub async fn mutate_counters<S, F>(store: &S, token: &Item, mutate: F) -> Result<Option<Item>, String>
where
    S: ItemStore,
    F: Fn(&mut Vec<Counter>) + 'static,
{
    store
        .update_items(slice::from_ref(token), move |item| {
            let mut counters = metadata::read_counters(item);
            mutate(&mut counters);
            metadata::write_counters(item, &counters);
        })
        .await?;
    fetch_token(store, &token.id).await
}

/// Append a fresh hidden counter.
pub async fn add_counter<S: ItemStore>(store: &S, token: &Item) -> Result<Option<Item>, String> {
    mutate_counters(store, token, |counters| counters.push(Counter::default())).await
}

pub async fn set_value<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    value: f64,
) -> Result<(), String> {
    let Some(updated) = mutate_counters(store, token, move |counters| {
        if let Some(counter) = counters.get_mut(index) {
            counter.value = value;
        }
    })
    .await?
    else {
        return Ok(());
    };
    visualisation::refresh_content(store, &updated, index).await
}

pub async fn set_max_value<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    max_value: f64,
) -> Result<(), String> {
    let Some(updated) = mutate_counters(store, token, move |counters| {
        if let Some(counter) = counters.get_mut(index) {
            counter.max_value = max_value;
        }
    })
    .await?
    else {
        return Ok(());
    };
    visualisation::refresh_content(store, &updated, index).await
}

/// Apply a signed delta from the quick-modify field.
pub async fn modify_value<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    delta: f64,
) -> Result<(), String> {
    let Some(updated) = mutate_counters(store, token, move |counters| {
        if let Some(counter) = counters.get_mut(index) {
            counter.value += delta;
        }
    })
    .await?
    else {
        return Ok(());
    };
    visualisation::refresh_content(store, &updated, index).await
}

pub async fn set_colour<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    colour: String,
) -> Result<(), String> {
    let Some(updated) = mutate_counters(store, token, move |counters| {
        if let Some(counter) = counters.get_mut(index) {
            counter.colour = colour.clone();
        }
    })
    .await?
    else {
        return Ok(());
    };
    visualisation::refresh_content(store, &updated, index).await
}

/// Panel-only; overlays never render the label.
pub async fn set_label<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    label: String,
) -> Result<Option<Item>, String> {
    mutate_counters(store, token, move |counters| {
        if let Some(counter) = counters.get_mut(index) {
            counter.label = label.clone();
        }
    })
    .await
}

/// Switch a counter's display mode and drive the overlay transition.
/// Nothing to do when the mode is unchanged.
pub async fn set_show_as<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    show_as: ShowAs,
) -> Result<(), String> {
    let current = metadata::read_counters(token).get(index).map(|c| c.show_as);
    if current == Some(show_as) || current.is_none() {
        return Ok(());
    }

    let Some(updated) = mutate_counters(store, token, move |counters| {
        if let Some(counter) = counters.get_mut(index) {
            counter.show_as = show_as;
        }
    })
    .await?
    else {
        return Ok(());
    };

    if show_as == ShowAs::Hidden {
        visualisation::hide(store, &updated, index).await
    } else {
        visualisation::set_display_mode(store, &updated, index, show_as).await
    }
}

/// Splice a counter out and repair the overlay index mapping: delete its
/// items, shift every later overlay's index down by one, re-stack.
pub async fn remove_counter<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
) -> Result<Option<Item>, String> {
    let updated = mutate_counters(store, token, move |counters| {
        if index < counters.len() {
            counters.remove(index);
        }
    })
    .await?;
    if let Some(updated) = &updated {
        visualisation::remove(store, updated, index).await?;
    }
    Ok(updated)
}

/// Flip the token between all-players and GM-only display.
pub async fn toggle_gm_only<S: ItemStore>(store: &S, token: &Item) -> Result<bool, String> {
    let gm_only = !metadata::is_gm_only(token);
    store
        .update_items(slice::from_ref(token), move |item| {
            metadata::set_gm_only(item, gm_only);
        })
        .await?;
    visualisation::set_gm_only(store, &token.id, gm_only).await?;
    Ok(gm_only)
}

/// Parse the quick-modify field: a leading `+` or `-` followed by a
/// number. Anything else is rejected.
pub fn parse_modify(input: &str) -> Option<f64> {
    let mut chars = input.trim().chars();
    let sign = chars.next()?;
    let magnitude: f64 = chars.as_str().parse().ok()?;
    if !magnitude.is_finite() {
        return None;
    }
    match sign {
        '+' => Some(magnitude),
        '-' => Some(-magnitude),
        _ => None,
    }
}

// ========================
// Panel Loading
// ========================

/// What the side panel should show for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    /// Nothing selected, or nothing we manage.
    NoToken,
    /// The token exists but this player may not see its counters.
    Restricted,
    Controls {
        token: Item,
        counters: Vec<Counter>,
        gm_only: bool,
    },
}

pub async fn load_panel<S: ItemStore>(
    store: &S,
    role: PlayerRole,
    selection: Option<Vec<String>>,
) -> Result<PanelView, String> {
    let Some(selection) = selection else {
        return Ok(PanelView::NoToken);
    };
    let Some(token) = find_token(store, &selection).await? else {
        return Ok(PanelView::NoToken);
    };
    if !has_access(role, &token) {
        return Ok(PanelView::Restricted);
    }
    let counters = metadata::read_counters(&token);
    let gm_only = metadata::is_gm_only(&token);
    Ok(PanelView::Controls {
        token,
        counters,
        gm_only,
    })
}
