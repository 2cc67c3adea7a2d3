//! Ordered shallow merge of type definition maps.
//!
//! Each layer is one parsed `types.json`. Layers are folded in order: a
//! later layer's top-level key replaces any earlier definition wholesale,
//! nested objects are never merged. Every replacement is recorded as a
//! [`Collision`] so callers can report it.

mod collision;

pub use collision::Collision;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Mapping from type name to an opaque type definition.
///
/// Insertion order is preserved: a key keeps the position of its first
/// definition and takes the value of its last.
pub type TypeMap = Map<String, Value>;

/// One source of type definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Identifier of the source (usually its directory).
    pub origin: String,

    /// Top-level definitions of the source.
    pub types: TypeMap,
}

impl Layer {
    pub fn new(origin: impl Into<String>, types: TypeMap) -> Self {
        Self {
            origin: origin.into(),
            types,
        }
    }
}

/// Result of folding all layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Merged {
    /// The aggregate mapping.
    pub types: TypeMap,

    /// Overwrites in the order they happened.
    pub collisions: Vec<Collision>,

    owners: BTreeMap<String, String>,
}

impl Merged {
    /// Origin that supplied the final value of `key`.
    pub fn owner(&self, key: &str) -> Option<&str> {
        self.owners.get(key).map(String::as_str)
    }

    /// Collisions where the later definition differs from the earlier one.
    pub fn overrides(&self) -> impl Iterator<Item = &Collision> {
        self.collisions.iter().filter(|c| !c.identical)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn absorb(mut self, layer: Layer) -> Self {
        let Layer { origin, types } = layer;

        for (key, value) in types {
            if let Some(previous) = self.types.get(&key) {
                let previous_origin = self.owners.get(&key).cloned().unwrap_or_default();
                self.collisions.push(Collision {
                    key: key.clone(),
                    previous_origin,
                    origin: origin.clone(),
                    identical: *previous == value,
                });
            }
            self.owners.insert(key.clone(), origin.clone());
            self.types.insert(key, value);
        }

        self
    }
}

/// Fold layers in order, last definition wins.
pub fn merge_layers<I>(layers: I) -> Merged
where
    I: IntoIterator<Item = Layer>,
{
    layers.into_iter().fold(Merged::default(), Merged::absorb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(origin: &str, value: Value) -> Layer {
        match value {
            Value::Object(map) => Layer::new(origin, map),
            other => panic!("test layer must be an object, got {other}"),
        }
    }

    #[test]
    fn test_later_layer_wins() {
        let merged = merge_layers(vec![
            layer("a", json!({"Foo": 1, "Bar": 2})),
            layer("b", json!({"Bar": 3, "Baz": 4})),
        ]);

        assert_eq!(
            Value::Object(merged.types.clone()),
            json!({"Foo": 1, "Bar": 3, "Baz": 4})
        );
        assert_eq!(merged.owner("Bar"), Some("b"));
        assert_eq!(merged.owner("Foo"), Some("a"));
        assert_eq!(merged.owner("Missing"), None);
    }

    #[test]
    fn test_key_set_is_union() {
        let merged = merge_layers(vec![
            layer("primitives", json!({"Balance": "u128", "Moment": "u64"})),
            layer("pallets/dex", json!({"TradingPair": "(CurrencyId, CurrencyId)"})),
            layer("pallets/rewards", json!({})),
        ]);

        let keys: Vec<&str> = merged.types.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Balance", "Moment", "TradingPair"]);
        assert!(merged.collisions.is_empty());
    }

    #[test]
    fn test_key_keeps_first_position() {
        let merged = merge_layers(vec![
            layer("a", json!({"First": 1, "Second": 2, "Third": 3})),
            layer("b", json!({"Second": 20})),
        ]);

        let keys: Vec<&str> = merged.types.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["First", "Second", "Third"]);
        assert_eq!(merged.types["Second"], 20);
    }

    #[test]
    fn test_nested_objects_replaced_wholesale() {
        let merged = merge_layers(vec![
            layer("a", json!({"Order": {"id": "u64", "price": "Balance"}})),
            layer("b", json!({"Order": {"id": "Hash"}})),
        ]);

        assert_eq!(merged.types["Order"], json!({"id": "Hash"}));
    }

    #[test]
    fn test_collisions_name_previous_owner() {
        let merged = merge_layers(vec![
            layer("primitives", json!({"CurrencyId": "u8"})),
            layer("pallets/support", json!({"CurrencyId": "u16"})),
            layer("pallets/dex", json!({"CurrencyId": "u32"})),
        ]);

        assert_eq!(merged.collisions.len(), 2);
        assert_eq!(merged.collisions[0].previous_origin, "primitives");
        assert_eq!(merged.collisions[0].origin, "pallets/support");
        assert_eq!(merged.collisions[1].previous_origin, "pallets/support");
        assert_eq!(merged.collisions[1].origin, "pallets/dex");
        assert_eq!(merged.types["CurrencyId"], "u32");
    }

    #[test]
    fn test_identical_redefinition_not_overridden() {
        let merged = merge_layers(vec![
            layer("a", json!({"Balance": "u128", "Amount": "i128"})),
            layer("b", json!({"Balance": "u128", "Amount": "i64"})),
        ]);

        assert_eq!(merged.collisions.len(), 2);
        assert!(merged.collisions[0].identical);
        let overridden: Vec<&str> = merged.overrides().map(|c| c.key.as_str()).collect();
        assert_eq!(overridden, vec!["Amount"]);
    }

    #[test]
    fn test_no_layers() {
        let merged = merge_layers(Vec::new());
        assert!(merged.is_empty());
        assert!(merged.collisions.is_empty());
    }
}
