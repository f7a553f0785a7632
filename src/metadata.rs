//! Token Metadata Slice
//!
//! Typed accessors for the metadata keys this extension owns on scene
//! items. Everything is validated on read and defaulted when missing or
//! malformed, because the shared store may hold values written by any
//! client version.

use serde_json::Value;

use crate::models::{Counter, Item, PreviousProperties, Role};

/// Namespace prefix for every metadata key this extension writes.
pub const PLUGIN_ID: &str = "com.tokencounter.extension";

const COUNTERS: &str = "counters";
const DEAD: &str = "dead";
const PREVIOUS_PROPERTIES: &str = "previousProperties";
const GM_ONLY: &str = "gmOnly";
const ROLE: &str = "role";
const COUNTER_INDEX: &str = "counterIndex";

pub fn key(name: &str) -> String {
    format!("{PLUGIN_ID}/{name}")
}

/// Full key of the dead flag, for host-evaluated menu filters.
pub fn dead_key() -> String {
    key(DEAD)
}

/// The ordered counters of a token; empty when the key is absent.
///
/// A malformed element decodes as a default counter rather than dropping
/// out, so indices stay aligned with what other clients see.
pub fn read_counters(item: &Item) -> Vec<Counter> {
    match item.metadata.get(&key(COUNTERS)) {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

pub fn write_counters(item: &mut Item, counters: &[Counter]) {
    let encoded = serde_json::to_value(counters).unwrap_or(Value::Array(Vec::new()));
    item.metadata.insert(key(COUNTERS), encoded);
}

pub fn is_dead(item: &Item) -> bool {
    matches!(item.metadata.get(&key(DEAD)), Some(Value::Bool(true)))
}

pub fn set_dead(item: &mut Item, dead: bool) {
    item.metadata.insert(key(DEAD), Value::Bool(dead));
}

pub fn is_gm_only(item: &Item) -> bool {
    matches!(item.metadata.get(&key(GM_ONLY)), Some(Value::Bool(true)))
}

pub fn set_gm_only(item: &mut Item, gm_only: bool) {
    item.metadata.insert(key(GM_ONLY), Value::Bool(gm_only));
}

pub fn previous_properties(item: &Item) -> Option<PreviousProperties> {
    let value = item.metadata.get(&key(PREVIOUS_PROPERTIES))?;
    serde_json::from_value(value.clone()).ok()
}

pub fn set_previous_properties(item: &mut Item, properties: &PreviousProperties) {
    if let Ok(encoded) = serde_json::to_value(properties) {
        item.metadata.insert(key(PREVIOUS_PROPERTIES), encoded);
    }
}

/// Role tags of a derived item. Tolerates the single-string form.
pub fn roles(item: &Item) -> Vec<Role> {
    match item.metadata.get(&key(ROLE)) {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(|tag| serde_json::from_value(tag.clone()).ok())
            .collect(),
        Some(tag @ Value::String(_)) => serde_json::from_value(tag.clone()).ok().into_iter().collect(),
        _ => Vec::new(),
    }
}

pub fn has_role(item: &Item, role: Role) -> bool {
    roles(item).contains(&role)
}

pub fn set_roles(item: &mut Item, roles: &[Role]) {
    let encoded = serde_json::to_value(roles).unwrap_or(Value::Array(Vec::new()));
    item.metadata.insert(key(ROLE), encoded);
}

/// Which counter a derived item renders.
pub fn counter_index(item: &Item) -> Option<usize> {
    item.metadata
        .get(&key(COUNTER_INDEX))?
        .as_u64()
        .map(|index| index as usize)
}

pub fn set_counter_index(item: &mut Item, index: usize) {
    item.metadata
        .insert(key(COUNTER_INDEX), Value::from(index as u64));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShowAs;

    #[test]
    fn missing_counters_key_reads_as_empty() {
        assert!(read_counters(&Item::default()).is_empty());
    }

    #[test]
    fn malformed_counters_value_reads_as_empty() {
        let mut item = Item::default();
        item.metadata.insert(key(COUNTERS), Value::from("oops"));
        assert!(read_counters(&item).is_empty());
    }

    #[test]
    fn malformed_element_decodes_as_default_counter() {
        let mut item = Item::default();
        item.metadata.insert(
            key(COUNTERS),
            serde_json::json!([{ "value": 3, "showAs": "NUMBER" }, "garbage"]),
        );
        let counters = read_counters(&item);
        assert_eq!(counters.len(), 2);
        assert_eq!(counters[0].value, 3.0);
        assert_eq!(counters[0].show_as, ShowAs::Number);
        assert_eq!(counters[1], Counter::default());
    }

    #[test]
    fn counters_round_trip() {
        let mut item = Item::default();
        let counters = vec![
            Counter {
                value: 5.0,
                max_value: 10.0,
                show_as: ShowAs::Bar,
                colour: "#ff0000".to_string(),
                label: "HP".to_string(),
            },
            Counter::default(),
        ];
        write_counters(&mut item, &counters);
        assert_eq!(read_counters(&item), counters);
    }

    #[test]
    fn roles_tolerate_single_string_form() {
        let mut item = Item::default();
        item.metadata.insert(key(ROLE), Value::from("VISUALISATION"));
        assert!(has_role(&item, Role::Visualisation));
        assert!(!has_role(&item, Role::Bar));
    }

    #[test]
    fn roles_round_trip() {
        let mut item = Item::default();
        set_roles(&mut item, &[Role::Visualisation, Role::Bar]);
        assert!(has_role(&item, Role::Visualisation));
        assert!(has_role(&item, Role::Bar));
        assert!(!has_role(&item, Role::Dead));
    }

    #[test]
    fn counter_index_round_trip() {
        let mut item = Item::default();
        assert_eq!(counter_index(&item), None);
        set_counter_index(&mut item, 4);
        assert_eq!(counter_index(&item), Some(4));
    }

    #[test]
    fn previous_properties_round_trip() {
        let mut item = Item::default();
        let snapshot = PreviousProperties {
            layer: "CHARACTER".to_string(),
            locked: false,
        };
        set_previous_properties(&mut item, &snapshot);
        assert_eq!(previous_properties(&item), Some(snapshot));
    }
}
