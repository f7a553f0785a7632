//! Frontend Models
//!
//! Data structures matching host scene entities, plus the counter schema
//! this extension stores inside a token's metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scene layer names used by this extension.
pub mod layer {
    pub const CHARACTER: &str = "CHARACTER";
    pub const MOUNT: &str = "MOUNT";
    pub const PROP: &str = "PROP";
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Image,
    Text,
    Shape,
    /// Anything else on the scene we never touch.
    #[default]
    #[serde(other)]
    Other,
}

/// Image payload of an image item (tokens, the dead marker).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageContent {
    pub width: f64,
    pub height: f64,
    pub url: String,
    pub mime: String,
}

/// Grid metrics an image item was authored against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridInfo {
    pub dpi: f64,
    pub offset: Vector2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub font_weight: u32,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    /// Style fields the host manages that we never touch.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_weight: 400,
            fill_color: "#ffffff".to_string(),
            stroke_color: "black".to_string(),
            stroke_width: 0.0,
            extra: HashMap::new(),
        }
    }
}

/// Text payload of a text item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub text_type: String,
    pub plain_text: String,
    pub style: TextStyle,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for TextBlock {
    fn default() -> Self {
        Self {
            text_type: "PLAIN".to_string(),
            plain_text: String::new(),
            style: TextStyle::default(),
            extra: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: "#ffffff".to_string(),
            fill_opacity: 1.0,
            stroke_color: "black".to_string(),
            stroke_width: 0.0,
            extra: HashMap::new(),
        }
    }
}

/// Shape payload of a shape item (bar frames and fills).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeBlock {
    pub shape_type: String,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
}

impl Default for ShapeBlock {
    fn default() -> Self {
        Self {
            shape_type: "RECTANGLE".to_string(),
            width: 0.0,
            height: 0.0,
            style: ShapeStyle::default(),
        }
    }
}

/// A host-managed scene item.
///
/// Deserialization is lenient so a whole-scene snapshot decodes even when
/// it contains item kinds this extension never looks at; host fields we do
/// not model are carried through `extra` and survive read-modify-write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    pub layer: String,
    pub visible: bool,
    pub locked: bool,
    pub disable_hit: bool,
    pub position: Vector2,
    pub scale: Vector2,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<String>,
    pub metadata: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeBlock>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: ItemKind::Other,
            name: String::new(),
            layer: String::new(),
            visible: true,
            locked: false,
            disable_hit: false,
            position: Vector2::default(),
            scale: Vector2::new(1.0, 1.0),
            attached_to: None,
            metadata: HashMap::new(),
            image: None,
            grid: None,
            text: None,
            shape: None,
            extra: HashMap::new(),
        }
    }
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: new_item_id(),
            kind,
            ..Default::default()
        }
    }

    /// A text item with plain content.
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        let mut item = Self::new(ItemKind::Text);
        item.text = Some(TextBlock {
            text_type: "PLAIN".to_string(),
            plain_text: content.into(),
            style,
            extra: HashMap::new(),
        });
        item
    }

    /// A rectangle shape item.
    pub fn rectangle(width: f64, height: f64, style: ShapeStyle) -> Self {
        let mut item = Self::new(ItemKind::Shape);
        item.shape = Some(ShapeBlock {
            shape_type: "RECTANGLE".to_string(),
            width,
            height,
            style,
        });
        item
    }

    /// An image item sized against the given grid metrics.
    pub fn image(content: ImageContent, grid: GridInfo) -> Self {
        let mut item = Self::new(ItemKind::Image);
        item.image = Some(content);
        item.grid = Some(grid);
        item
    }

    pub fn attached_to(mut self, id: impl Into<String>) -> Self {
        self.attached_to = Some(id.into());
        self
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn position(mut self, position: Vector2) -> Self {
        self.position = position;
        self
    }

    pub fn scale(mut self, scale: Vector2) -> Self {
        self.scale = scale;
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn disable_hit(mut self, disable_hit: bool) -> Self {
        self.disable_hit = disable_hit;
        self
    }
}

#[cfg(target_arch = "wasm32")]
fn new_item_id() -> String {
    let a = (js_sys::Math::random() * 0x1_0000_0000_u64 as f64) as u64;
    let b = (js_sys::Math::random() * 0x1_0000_0000_u64 as f64) as u64;
    format!("{a:08x}-{b:08x}")
}

#[cfg(not(target_arch = "wasm32"))]
fn new_item_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT: AtomicU64 = AtomicU64::new(1);
    format!("item-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}

// ========================
// Counter Schema
// ========================

/// How a counter renders on its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowAs {
    Number,
    Bar,
    #[default]
    #[serde(other)]
    Hidden,
}

/// One counter stored in a token's metadata.
///
/// Decoding is lenient: every missing field takes its default so counters
/// written by older clients keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Counter {
    pub value: f64,
    /// 0 means "no maximum"; the value renders alone.
    pub max_value: f64,
    pub show_as: ShowAs,
    pub colour: String,
    pub label: String,
}

impl Default for Counter {
    fn default() -> Self {
        Self {
            value: 0.0,
            max_value: 0.0,
            show_as: ShowAs::Hidden,
            colour: "#ffffff".to_string(),
            label: String::new(),
        }
    }
}

/// Role tags carried by items this extension derives from counter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Visualisation,
    /// The dynamic fill of a bar, as opposed to its static frame.
    Bar,
    Dead,
}

/// Token display state snapshotted before a dead-mark, restored on unmark.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviousProperties {
    pub layer: String,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerRole {
    Gm,
    #[serde(other)]
    Player,
}

/// Payload of a player-change notification from the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSnapshot {
    pub selection: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_show_as_decodes_as_hidden() {
        let counter: Counter =
            serde_json::from_value(serde_json::json!({ "showAs": "SPARKLINE" })).unwrap();
        assert_eq!(counter.show_as, ShowAs::Hidden);
    }

    #[test]
    fn counter_defaults_fill_missing_fields() {
        let counter: Counter = serde_json::from_value(serde_json::json!({ "value": 7 })).unwrap();
        assert_eq!(counter.value, 7.0);
        assert_eq!(counter.max_value, 0.0);
        assert_eq!(counter.colour, "#ffffff");
        assert_eq!(counter.label, "");
    }

    #[test]
    fn scene_snapshot_tolerates_unknown_item_kinds() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "type": "CURVE",
            "layer": "DRAWING",
            "points": [[0, 0], [1, 1]]
        }))
        .unwrap();
        assert_eq!(item.kind, ItemKind::Other);
        assert!(item.extra.contains_key("points"));
        assert!(item.visible);
        assert_eq!(item.scale, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn host_only_fields_survive_a_round_trip() {
        let source = serde_json::json!({
            "id": "abc",
            "type": "TEXT",
            "layer": "TEXT",
            "zIndex": 17,
            "text": { "type": "PLAIN", "plainText": "3/10", "style": { "fontSize": 50 } }
        });
        let item: Item = serde_json::from_value(source).unwrap();
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["zIndex"], 17);
        assert_eq!(back["text"]["plainText"], "3/10");
    }

    #[test]
    fn generated_item_ids_are_unique() {
        assert_ne!(Item::new(ItemKind::Text).id, Item::new(ItemKind::Text).id);
    }
}
