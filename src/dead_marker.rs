//! Dead Marker
//!
//! Marks a token dead: its display layer and lock state are snapshotted
//! into metadata, the token is parked on the prop layer, and a marker
//! image is attached. Unmarking restores the snapshot exactly. Driven by
//! a context-menu entry whose two variants the host filters on layer and
//! on the dead flag.

use std::slice;

use serde_json::json;

use leptos::task::spawn_local;

use crate::counters;
use crate::host::{self, ContextMenuFilter, ContextMenuIcon, ItemStore, KeyFilter, ObrStore};
use crate::metadata;
use crate::models::{layer, ImageContent, Item, PreviousProperties, Role};

pub async fn toggle<S: ItemStore>(store: &S, token: &Item, marker_url: &str) -> Result<(), String> {
    if metadata::is_dead(token) {
        unmark_dead(store, token).await
    } else {
        mark_dead(store, token, marker_url).await
    }
}

pub async fn mark_dead<S: ItemStore>(
    store: &S,
    token: &Item,
    marker_url: &str,
) -> Result<(), String> {
    let snapshot = PreviousProperties {
        layer: token.layer.clone(),
        locked: token.locked,
    };
    store
        .update_items(slice::from_ref(token), move |item| {
            metadata::set_dead(item, true);
            metadata::set_previous_properties(item, &snapshot);
            item.layer = layer::PROP.to_string();
            item.locked = true;
        })
        .await?;

    let (Some(image), Some(grid)) = (token.image.clone(), token.grid.clone()) else {
        return Ok(());
    };
    let content = ImageContent {
        width: image.width,
        height: image.height,
        url: marker_url.to_string(),
        mime: "image/png".to_string(),
    };
    let mut marker = Item::image(content, grid)
        .layer(layer::PROP)
        .attached_to(&token.id)
        .position(token.position)
        .scale(token.scale)
        .locked(true)
        .disable_hit(true);
    metadata::set_roles(&mut marker, &[Role::Dead]);
    store.add_items(vec![marker]).await
}

pub async fn unmark_dead<S: ItemStore>(store: &S, token: &Item) -> Result<(), String> {
    let items = store.items().await?;
    let markers: Vec<String> = items
        .iter()
        .filter(|item| {
            item.attached_to.as_deref() == Some(token.id.as_str())
                && metadata::has_role(item, Role::Dead)
        })
        .map(|item| item.id.clone())
        .collect();

    store
        .update_items(slice::from_ref(token), |item| {
            metadata::set_dead(item, false);
            if let Some(previous) = metadata::previous_properties(item) {
                item.layer = previous.layer;
                item.locked = previous.locked;
            }
        })
        .await?;

    // Marker already gone when another client raced us: nothing to delete.
    if !markers.is_empty() {
        store.delete_items(&markers).await?;
    }
    Ok(())
}

/// The two host-filtered variants of the context-menu entry.
pub fn menu_icons(icon_url: &str) -> Vec<ContextMenuIcon> {
    vec![
        ContextMenuIcon {
            icon: icon_url.to_string(),
            label: "Mark as dead".to_string(),
            filter: ContextMenuFilter {
                every: vec![
                    KeyFilter {
                        key: json!("layer"),
                        value: json!(layer::CHARACTER),
                        coordinator: Some("||".to_string()),
                    },
                    KeyFilter {
                        key: json!("layer"),
                        value: json!(layer::MOUNT),
                        coordinator: None,
                    },
                ],
            },
        },
        ContextMenuIcon {
            icon: icon_url.to_string(),
            label: "Unmark as dead".to_string(),
            filter: ContextMenuFilter {
                every: vec![KeyFilter {
                    key: json!(["metadata", metadata::dead_key()]),
                    value: json!(true),
                    coordinator: None,
                }],
            },
        },
    ]
}

/// Register the mark/unmark entry with the host's context menu.
pub async fn register_menu() -> Result<(), String> {
    let icons = menu_icons("/images/dead.svg");
    host::register_context_menu(&metadata::key("context-menu"), &icons, || {
        spawn_local(async {
            if let Err(error) = toggle_selected().await {
                host::log(&format!("dead toggle failed: {error}"));
            }
        });
    })
    .await
}

async fn toggle_selected() -> Result<(), String> {
    let Some(selection) = host::get_selection().await? else {
        return Ok(());
    };
    let Some(token) = counters::find_token(&ObrStore, &selection).await? else {
        return Ok(());
    };
    let origin = web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default();
    toggle(&ObrStore, &token, &format!("{origin}/images/dead.png")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{character_token, FakeStore};
    use crate::models::Vector2;

    const MARKER_URL: &str = "https://example.invalid/images/dead.png";

    fn marker_count(store: &FakeStore, token_id: &str) -> usize {
        store
            .all()
            .iter()
            .filter(|item| {
                item.attached_to.as_deref() == Some(token_id)
                    && metadata::has_role(item, Role::Dead)
            })
            .count()
    }

    #[tokio::test]
    async fn mark_dead_parks_the_token_and_attaches_a_marker() {
        let store = FakeStore::new(150.0);
        let id = store.insert(character_token(300.0, 150.0, Vector2::new(40.0, 60.0)));
        let token = store.get(&id).unwrap();
        assert_eq!(token.layer, layer::CHARACTER);
        assert!(!token.locked);

        mark_dead(&store, &token, MARKER_URL).await.unwrap();

        let token = store.get(&id).unwrap();
        assert!(metadata::is_dead(&token));
        assert_eq!(token.layer, layer::PROP);
        assert!(token.locked);
        assert_eq!(marker_count(&store, &id), 1);

        let marker = store
            .all()
            .into_iter()
            .find(|item| metadata::has_role(item, Role::Dead))
            .unwrap();
        assert_eq!(marker.position, Vector2::new(40.0, 60.0));
        assert!(marker.locked);
        assert!(marker.disable_hit);
        assert_eq!(marker.image.unwrap().url, MARKER_URL);
    }

    #[tokio::test]
    async fn unmark_dead_restores_the_snapshot_exactly() {
        let store = FakeStore::new(150.0);
        let id = store.insert(character_token(300.0, 150.0, Vector2::new(0.0, 0.0)));
        let token = store.get(&id).unwrap();

        mark_dead(&store, &token, MARKER_URL).await.unwrap();
        let token = store.get(&id).unwrap();
        unmark_dead(&store, &token).await.unwrap();

        let token = store.get(&id).unwrap();
        assert!(!metadata::is_dead(&token));
        assert_eq!(token.layer, layer::CHARACTER);
        assert!(!token.locked);
        assert_eq!(marker_count(&store, &id), 0);
    }

    #[tokio::test]
    async fn unmark_dead_without_a_marker_is_a_noop() {
        let store = FakeStore::new(150.0);
        let id = store.insert(character_token(300.0, 150.0, Vector2::new(0.0, 0.0)));
        let token = store.get(&id).unwrap();
        mark_dead(&store, &token, MARKER_URL).await.unwrap();

        // Another client already deleted the marker image.
        let marker_ids: Vec<String> = store
            .all()
            .into_iter()
            .filter(|item| metadata::has_role(item, Role::Dead))
            .map(|item| item.id)
            .collect();
        store.delete_items(&marker_ids).await.unwrap();

        let token = store.get(&id).unwrap();
        unmark_dead(&store, &token).await.unwrap();
        let token = store.get(&id).unwrap();
        assert_eq!(token.layer, layer::CHARACTER);
    }

    #[tokio::test]
    async fn toggle_follows_the_dead_flag() {
        let store = FakeStore::new(150.0);
        let id = store.insert(character_token(300.0, 150.0, Vector2::new(0.0, 0.0)));

        let token = store.get(&id).unwrap();
        toggle(&store, &token, MARKER_URL).await.unwrap();
        assert!(metadata::is_dead(&store.get(&id).unwrap()));

        let token = store.get(&id).unwrap();
        toggle(&store, &token, MARKER_URL).await.unwrap();
        assert!(!metadata::is_dead(&store.get(&id).unwrap()));
    }

    #[test]
    fn menu_variants_filter_on_layer_and_dead_flag() {
        let icons = menu_icons("/images/dead.svg");
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0].filter.every[0].value, json!("CHARACTER"));
        assert_eq!(icons[0].filter.every[0].coordinator.as_deref(), Some("||"));
        assert_eq!(icons[1].filter.every[0].key, json!(["metadata", metadata::dead_key()]));
    }
}
