//! Host SDK Bindings
//!
//! Typed wrappers over the host SDK object the embedding page exposes as
//! the global `OBR`, marshalled through serde. Calls reject with opaque
//! values, surfaced as strings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::ItemStore;
use crate::models::{Item, PlayerRole, PlayerSnapshot};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["OBR", "scene", "items"], js_name = getItems)]
    async fn scene_get_items() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["OBR", "scene", "items"], js_name = addItems)]
    async fn scene_add_items(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["OBR", "scene", "items"], js_name = updateItems)]
    async fn scene_update_items(items: JsValue, update: js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["OBR", "scene", "items"], js_name = deleteItems)]
    async fn scene_delete_items(ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["OBR", "scene", "grid"], js_name = getDpi)]
    async fn grid_get_dpi() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["OBR", "player"], js_name = getSelection)]
    async fn player_get_selection() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["OBR", "player"], js_name = getRole)]
    async fn player_get_role() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["OBR", "player"], js_name = onChange)]
    fn player_on_change(callback: &js_sys::Function);

    #[wasm_bindgen(catch, js_namespace = ["OBR", "contextMenu"], js_name = create)]
    async fn context_menu_create(config: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = OBR, js_name = onReady)]
    fn host_on_ready(callback: &js_sys::Function);
}

fn js_error(error: JsValue) -> String {
    format!("host call failed: {error:?}")
}

/// Serialize into plain JS objects (not ES maps), matching what the SDK
/// expects for items and metadata.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(|e| e.to_string())
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// The live scene store behind the `OBR` global.
#[derive(Clone, Copy)]
pub struct ObrStore;

impl ItemStore for ObrStore {
    async fn items(&self) -> Result<Vec<Item>, String> {
        from_js(scene_get_items().await.map_err(js_error)?)
    }

    async fn add_items(&self, items: Vec<Item>) -> Result<(), String> {
        scene_add_items(to_js(&items)?).await.map_err(js_error)
    }

    async fn update_items<F>(&self, targets: &[Item], mutate: F) -> Result<(), String>
    where
        F: Fn(&mut Item) + 'static,
    {
        // The SDK hands the updater draft items; each draft is decoded,
        // mutated, and the result merged back onto the draft so host
        // fields we do not model are left alone.
        let updater = Closure::<dyn FnMut(js_sys::Array)>::new(move |drafts: js_sys::Array| {
            for draft in drafts.iter() {
                let Ok(mut item) = serde_wasm_bindgen::from_value::<Item>(draft.clone()) else {
                    continue;
                };
                mutate(&mut item);
                let Ok(patched) = to_js(&item) else {
                    continue;
                };
                if let (Some(target), Some(source)) =
                    (draft.dyn_ref::<js_sys::Object>(), patched.dyn_ref::<js_sys::Object>())
                {
                    js_sys::Object::assign(target, source);
                }
            }
        });
        let update: &js_sys::Function = updater.as_ref().unchecked_ref();
        scene_update_items(to_js(targets)?, update.clone())
            .await
            .map_err(js_error)
    }

    async fn delete_items(&self, ids: &[String]) -> Result<(), String> {
        scene_delete_items(to_js(ids)?).await.map_err(js_error)
    }

    async fn grid_dpi(&self) -> Result<f64, String> {
        from_js(grid_get_dpi().await.map_err(js_error)?)
    }
}

pub async fn get_selection() -> Result<Option<Vec<String>>, String> {
    from_js(player_get_selection().await.map_err(js_error)?)
}

pub async fn get_role() -> Result<PlayerRole, String> {
    from_js(player_get_role().await.map_err(js_error)?)
}

/// Run a callback once the host reports it is initialized.
pub fn on_ready(callback: impl Fn() + 'static) {
    let callback = Closure::<dyn FnMut()>::new(move || callback());
    host_on_ready(callback.as_ref().unchecked_ref());
    callback.forget();
}

/// Subscribe to local player changes (selection updates).
pub fn on_player_change(callback: impl Fn(PlayerSnapshot) + 'static) {
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |player: JsValue| {
        if let Ok(snapshot) = serde_wasm_bindgen::from_value::<PlayerSnapshot>(player) {
            callback(snapshot);
        }
    });
    player_on_change(callback.as_ref().unchecked_ref());
    callback.forget();
}

// ========================
// Context Menu
// ========================

/// One icon/label variant of a context-menu entry, shown when its filter
/// matches the host's selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuIcon {
    pub icon: String,
    pub label: String,
    pub filter: ContextMenuFilter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuFilter {
    pub every: Vec<KeyFilter>,
}

/// A single host-evaluated predicate on item fields. `key` is a field name
/// or a path of segments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFilter {
    pub key: Value,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinator: Option<String>,
}

/// Register a context-menu entry with the host.
pub async fn register_context_menu(
    id: &str,
    icons: &[ContextMenuIcon],
    on_click: impl Fn() + 'static,
) -> Result<(), String> {
    #[derive(Serialize)]
    struct Config<'a> {
        id: &'a str,
        icons: &'a [ContextMenuIcon],
    }

    let config = to_js(&Config { id, icons })?;
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |_context: JsValue| on_click());
    js_sys::Reflect::set(&config, &JsValue::from_str("onClick"), callback.as_ref())
        .map_err(|_| "failed to attach the menu click handler".to_string())?;
    callback.forget();
    context_menu_create(config).await.map_err(js_error)
}
