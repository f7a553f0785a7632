//! Counter Visualisations
//!
//! Derives and maintains the overlay items that render a token's counters:
//! one text item per NUMBER counter, a frame and a fill rectangle per BAR
//! counter, nothing for HIDDEN. Overlays are derived state only: deleted
//! and recreated on display-mode changes, patched in place on content
//! changes, and every lookup tolerates another client having deleted them
//! first.

use std::collections::HashMap;

use crate::geometry::{self, Anchor};
use crate::host::ItemStore;
use crate::metadata;
use crate::models::{Counter, Item, Role, ShapeStyle, ShowAs, TextStyle, Vector2};

const TEXT_BLOCK_HEIGHT: f64 = 50.0;
const BAR_BLOCK_HEIGHT: f64 = 20.0;
const BLOCK_GAP: f64 = 4.0;
const FONT_WEIGHT: u32 = 700;
const OUTLINE_COLOUR: &str = "black";
const OUTLINE_WIDTH: f64 = 2.0;

/// On-token text for a counter value.
pub fn format_value(value: f64, max_value: f64) -> String {
    if max_value == 0.0 {
        format!("{value}")
    } else {
        format!("{value}/{max_value}")
    }
}

fn block_height(mode: ShowAs) -> f64 {
    match mode {
        ShowAs::Hidden => 0.0,
        ShowAs::Number => TEXT_BLOCK_HEIGHT,
        ShowAs::Bar => BAR_BLOCK_HEIGHT,
    }
}

/// Vertical slot of one non-hidden counter in the overlay stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySlot {
    pub counter_index: usize,
    pub offset: f64,
}

/// Stack every non-hidden counter in index order from the token's top
/// anchor, each block advancing by its mode's height plus a fixed gap.
pub fn layout_slots(counters: &[Counter]) -> Vec<OverlaySlot> {
    let mut offset = 0.0;
    let mut slots = Vec::new();
    for (counter_index, counter) in counters.iter().enumerate() {
        if counter.show_as == ShowAs::Hidden {
            continue;
        }
        slots.push(OverlaySlot { counter_index, offset });
        offset += block_height(counter.show_as) + BLOCK_GAP;
    }
    slots
}

// ========================
// Overlay Lookup
// ========================

fn is_overlay(item: &Item, token_id: &str) -> bool {
    item.attached_to.as_deref() == Some(token_id) && metadata::has_role(item, Role::Visualisation)
}

fn overlays_for_index(items: &[Item], token_id: &str, index: usize) -> Vec<Item> {
    items
        .iter()
        .filter(|item| is_overlay(item, token_id) && metadata::counter_index(item) == Some(index))
        .cloned()
        .collect()
}

fn overlays_from(items: &[Item], token_id: &str, start_index: usize) -> Vec<Item> {
    items
        .iter()
        .filter(|item| {
            is_overlay(item, token_id)
                && metadata::counter_index(item).is_some_and(|index| index >= start_index)
        })
        .cloned()
        .collect()
}

fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}

// ========================
// Overlay Construction
// ========================

fn number_item(token: &Item, index: usize, counter: &Counter, anchor: Anchor, visible: bool) -> Item {
    let style = TextStyle {
        font_size: TEXT_BLOCK_HEIGHT,
        font_weight: FONT_WEIGHT,
        fill_color: counter.colour.clone(),
        stroke_color: OUTLINE_COLOUR.to_string(),
        stroke_width: OUTLINE_WIDTH,
        extra: HashMap::new(),
    };
    let mut item = Item::text(format_value(counter.value, counter.max_value), style)
        .attached_to(&token.id)
        .position(Vector2::new(anchor.x, anchor.y))
        .locked(true)
        .visible(visible)
        .disable_hit(true);
    metadata::set_roles(&mut item, &[Role::Visualisation]);
    metadata::set_counter_index(&mut item, index);
    item
}

fn bar_items(token: &Item, index: usize, counter: &Counter, anchor: Anchor, visible: bool) -> Vec<Item> {
    let frame_style = ShapeStyle {
        fill_color: "#000000".to_string(),
        fill_opacity: 0.0,
        stroke_color: OUTLINE_COLOUR.to_string(),
        stroke_width: OUTLINE_WIDTH,
        extra: HashMap::new(),
    };
    let mut frame = Item::rectangle(anchor.width, BAR_BLOCK_HEIGHT, frame_style)
        .attached_to(&token.id)
        .position(Vector2::new(anchor.x, anchor.y))
        .locked(true)
        .visible(visible)
        .disable_hit(true);
    metadata::set_roles(&mut frame, &[Role::Visualisation]);
    metadata::set_counter_index(&mut frame, index);

    let fill_style = ShapeStyle {
        fill_color: counter.colour.clone(),
        fill_opacity: 1.0,
        stroke_color: OUTLINE_COLOUR.to_string(),
        stroke_width: 0.0,
        extra: HashMap::new(),
    };
    let width = geometry::bar_width(counter.value, counter.max_value, anchor.width);
    let mut fill = Item::rectangle(width, BAR_BLOCK_HEIGHT, fill_style)
        .attached_to(&token.id)
        .position(Vector2::new(anchor.x, anchor.y))
        .locked(true)
        .visible(visible)
        .disable_hit(true);
    metadata::set_roles(&mut fill, &[Role::Visualisation, Role::Bar]);
    metadata::set_counter_index(&mut fill, index);

    vec![frame, fill]
}

async fn create_overlays<S: ItemStore>(store: &S, token: &Item, index: usize) -> Result<(), String> {
    let counters = metadata::read_counters(token);
    let Some(counter) = counters.get(index) else {
        return Ok(());
    };
    let dpi = store.grid_dpi().await?;
    let Some(anchor) = geometry::token_anchor(token, dpi) else {
        return Ok(());
    };
    let visible = !metadata::is_gm_only(token);

    let items = match counter.show_as {
        ShowAs::Hidden => return Ok(()),
        ShowAs::Number => vec![number_item(token, index, counter, anchor, visible)],
        ShowAs::Bar => bar_items(token, index, counter, anchor, visible),
    };
    store.add_items(items).await
}

// ========================
// Synchronization
// ========================

/// Transition counter `index` to its display mode recorded in the token's
/// metadata: delete whatever items currently render it, create the new
/// mode's items, and re-stack the token's overlays.
pub async fn set_display_mode<S: ItemStore>(
    store: &S,
    token: &Item,
    index: usize,
    mode: ShowAs,
) -> Result<(), String> {
    let items = store.items().await?;
    let existing = overlays_for_index(&items, &token.id, index);
    if !existing.is_empty() {
        store.delete_items(&ids(&existing)).await?;
    }
    if mode != ShowAs::Hidden {
        create_overlays(store, token, index).await?;
    }
    relayout(store, token).await
}

/// Delete counter `index`'s overlay items. Already gone is fine.
pub async fn hide<S: ItemStore>(store: &S, token: &Item, index: usize) -> Result<(), String> {
    let items = store.items().await?;
    let existing = overlays_for_index(&items, &token.id, index);
    if !existing.is_empty() {
        store.delete_items(&ids(&existing)).await?;
    }
    relayout(store, token).await
}

/// Patch counter `index`'s overlays in place from the token's current
/// metadata: text content for numbers, fill width and colour for bars.
/// A no-op when another client already deleted the overlays.
pub async fn refresh_content<S: ItemStore>(store: &S, token: &Item, index: usize) -> Result<(), String> {
    let counters = metadata::read_counters(token);
    let Some(counter) = counters.get(index).cloned() else {
        return Ok(());
    };
    let items = store.items().await?;
    let targets = overlays_for_index(&items, &token.id, index);
    if targets.is_empty() {
        return Ok(());
    }

    let dpi = store.grid_dpi().await?;
    let fill_width = geometry::token_anchor(token, dpi)
        .map(|anchor| geometry::bar_width(counter.value, counter.max_value, anchor.width));

    store
        .update_items(&targets, move |item| {
            let is_fill = metadata::has_role(item, Role::Bar);
            if let Some(text) = item.text.as_mut() {
                text.plain_text = format_value(counter.value, counter.max_value);
                text.style.fill_color = counter.colour.clone();
            }
            if let Some(shape) = item.shape.as_mut() {
                if is_fill {
                    if let Some(width) = fill_width {
                        shape.width = width;
                    }
                    shape.style.fill_color = counter.colour.clone();
                }
            }
        })
        .await
}

/// Flip every overlay of a token between all-players and GM-only display.
pub async fn set_gm_only<S: ItemStore>(store: &S, token_id: &str, gm_only: bool) -> Result<(), String> {
    let items = store.items().await?;
    let overlays = overlays_from(&items, token_id, 0);
    if overlays.is_empty() {
        return Ok(());
    }
    store
        .update_items(&overlays, move |item| item.visible = !gm_only)
        .await
}

/// Re-stack every overlay of a token at its counter's slot.
pub async fn relayout<S: ItemStore>(store: &S, token: &Item) -> Result<(), String> {
    let dpi = store.grid_dpi().await?;
    let Some(anchor) = geometry::token_anchor(token, dpi) else {
        return Ok(());
    };
    let items = store.items().await?;
    let overlays = overlays_from(&items, &token.id, 0);
    if overlays.is_empty() {
        return Ok(());
    }

    let offsets: HashMap<usize, f64> = layout_slots(&metadata::read_counters(token))
        .into_iter()
        .map(|slot| (slot.counter_index, slot.offset))
        .collect();
    store
        .update_items(&overlays, move |item| {
            let Some(index) = metadata::counter_index(item) else {
                return;
            };
            let Some(offset) = offsets.get(&index) else {
                return;
            };
            item.position = Vector2::new(anchor.x, anchor.y + offset);
        })
        .await
}

/// Remove counter `index`'s overlays after the counter itself was spliced
/// out of the token's metadata, then shift the indices of every overlay
/// past it down by one so they keep matching their counters' array
/// positions, and re-stack.
pub async fn remove<S: ItemStore>(store: &S, token: &Item, index: usize) -> Result<(), String> {
    let items = store.items().await?;
    let doomed = overlays_for_index(&items, &token.id, index);
    if !doomed.is_empty() {
        store.delete_items(&ids(&doomed)).await?;
    }

    let after = overlays_from(&items, &token.id, index + 1);
    if !after.is_empty() {
        store
            .update_items(&after, |item| {
                if let Some(current) = metadata::counter_index(item) {
                    metadata::set_counter_index(item, current.saturating_sub(1));
                }
            })
            .await?;
    }

    relayout(store, token).await
}
