//! Generic diff over declarative property tables.
//!
//! Each entity type describes its observable state as a table of
//! [`Property`] descriptors. The functions here turn a table plus an entity
//! into a [`Snapshot`], a creation payload, or the operations needed to move
//! the remote side from a base snapshot to the live one. Values are compared
//! with `serde_json::Value` equality.

use serde_json::{Map, Value};

use crate::ids::{EntityId, EntityKind};
use crate::protocol::Operation;
use crate::snapshot::Snapshot;
use crate::view::GridView;

/// How a property takes part in synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Sent with `Create` and never diffed afterwards. Null values are omitted.
    CreateOnly,
    /// Sent with `Create` when not default, then as `Set` on change.
    Diffed,
    /// A boolean event interest, sent as `Listen`.
    Listener,
}

/// Reads a property value of an entity of type `T`.
pub type Reader<T> = fn(&GridView<'_>, &T) -> Value;

/// Descriptor of one synchronized property.
pub struct Property<T> {
    pub key: &'static str,
    pub kind: PropertyKind,
    pub read: Reader<T>,
    pub default: Reader<T>,
}

fn null<T>(_: &GridView<'_>, _: &T) -> Value {
    Value::Null
}

fn falsy<T>(_: &GridView<'_>, _: &T) -> Value {
    Value::Bool(false)
}

impl<T> Property<T> {
    pub const fn create_only(key: &'static str, read: Reader<T>) -> Self {
        Self {
            key,
            kind: PropertyKind::CreateOnly,
            read,
            default: null::<T>,
        }
    }

    pub const fn diffed(key: &'static str, read: Reader<T>, default: Reader<T>) -> Self {
        Self {
            key,
            kind: PropertyKind::Diffed,
            read,
            default,
        }
    }

    pub const fn listener(event: &'static str, read: Reader<T>) -> Self {
        Self {
            key: event,
            kind: PropertyKind::Listener,
            read,
            default: falsy::<T>,
        }
    }

    fn is_tracked(&self) -> bool {
        self.kind != PropertyKind::CreateOnly
    }
}

/// Live values of every tracked property.
pub fn capture<T>(table: &[Property<T>], view: &GridView<'_>, entity: &T) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for property in table.iter().filter(|p| p.is_tracked()) {
        snapshot.insert(property.key, (property.read)(view, entity));
    }
    snapshot
}

/// Read a single property by key.
pub fn read<T>(table: &[Property<T>], key: &str, view: &GridView<'_>, entity: &T) -> Option<(&'static str, Value)> {
    table
        .iter()
        .find(|property| property.key == key)
        .map(|property| (property.key, (property.read)(view, entity)))
}

/// `Create` followed by `Listen` for enabled listeners. Only values that
/// differ from their defaults are included.
pub fn create_operations<T>(
    table: &[Property<T>],
    view: &GridView<'_>,
    entity: &T,
    id: EntityId,
    kind: EntityKind,
    live: &Snapshot,
) -> Vec<Operation> {
    let mut properties = Map::new();
    let mut listens = Vec::new();
    for property in table {
        match property.kind {
            PropertyKind::CreateOnly => {
                let value = (property.read)(view, entity);
                if !value.is_null() {
                    properties.insert(property.key.to_string(), value);
                }
            }
            PropertyKind::Diffed => {
                if let Some(value) = live.get(property.key) {
                    if *value != (property.default)(view, entity) {
                        properties.insert(property.key.to_string(), value.clone());
                    }
                }
            }
            PropertyKind::Listener => {
                if live.get(property.key) == Some(&Value::Bool(true)) {
                    listens.push(Operation::Listen {
                        id,
                        event: property.key.to_string(),
                        enabled: true,
                    });
                }
            }
        }
    }
    let mut operations = Vec::with_capacity(listens.len() + 1);
    operations.push(Operation::Create { id, kind, properties });
    operations.extend(listens);
    operations
}

/// `Set`/`Listen` operations for tracked properties whose live value differs
/// from the base, in table order. Keys missing from the base always count as
/// changed.
pub fn change_operations<T>(table: &[Property<T>], id: EntityId, base: &Snapshot, live: &Snapshot) -> Vec<Operation> {
    table
        .iter()
        .filter(|property| property.is_tracked())
        .filter_map(|property| {
            let value = live.get(property.key)?;
            if base.get(property.key) == Some(value) {
                return None;
            }
            Some(match property.kind {
                PropertyKind::Listener => Operation::Listen {
                    id,
                    event: property.key.to_string(),
                    enabled: value.as_bool().unwrap_or(false),
                },
                _ => Operation::Set {
                    id,
                    property: property.key.to_string(),
                    value: value.clone(),
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grid, GridStyle};
    use serde_json::json;

    struct Widget {
        size: i64,
        label: &'static str,
        owner: Option<&'static str>,
        listening: bool,
    }

    type P = Property<Widget>;

    static TABLE: &[P] = &[
        P::create_only("owner", |_, w| w.owner.map_or(Value::Null, |o| json!(o))),
        P::diffed("size", |_, w| json!(w.size), |_, _| json!(0)),
        P::diffed("label", |_, w| json!(w.label), |_, _| json!("")),
        P::listener("Selection", |_, w| json!(w.listening)),
    ];

    fn widget() -> Widget {
        Widget {
            size: 0,
            label: "",
            owner: None,
            listening: false,
        }
    }

    #[test]
    fn test_capture_skips_create_only() {
        let grid = Grid::new("w0", GridStyle::empty());
        let snapshot = capture(TABLE, &grid.view(), &widget());
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.get("owner").is_none());
    }

    #[test]
    fn test_create_payload_omits_defaults() {
        let grid = Grid::new("w0", GridStyle::empty());
        let w = widget();
        let live = capture(TABLE, &grid.view(), &w);
        let ops = create_operations(TABLE, &grid.view(), &w, EntityId(5), EntityKind::Column, &live);
        assert_eq!(
            ops,
            vec![Operation::Create {
                id: EntityId(5),
                kind: EntityKind::Column,
                properties: Map::new(),
            }]
        );
    }

    #[test]
    fn test_create_payload_with_values_and_listener() {
        let grid = Grid::new("w0", GridStyle::empty());
        let w = Widget {
            size: 4,
            owner: Some("w1"),
            listening: true,
            ..widget()
        };
        let live = capture(TABLE, &grid.view(), &w);
        let ops = create_operations(TABLE, &grid.view(), &w, EntityId(5), EntityKind::Column, &live);
        assert_eq!(ops.len(), 2);
        let Operation::Create { properties, .. } = &ops[0] else {
            panic!("expected create");
        };
        assert_eq!(properties.get("owner"), Some(&json!("w1")));
        assert_eq!(properties.get("size"), Some(&json!(4)));
        assert!(properties.get("label").is_none());
        assert_eq!(
            ops[1],
            Operation::Listen {
                id: EntityId(5),
                event: "Selection".into(),
                enabled: true
            }
        );
    }

    #[test]
    fn test_change_operations() {
        let grid = Grid::new("w0", GridStyle::empty());
        let before = capture(TABLE, &grid.view(), &widget());
        let after = capture(
            TABLE,
            &grid.view(),
            &Widget {
                label: "x",
                listening: true,
                ..widget()
            },
        );
        let ops = change_operations(TABLE, EntityId(5), &before, &after);
        assert_eq!(
            ops,
            vec![
                Operation::Set {
                    id: EntityId(5),
                    property: "label".into(),
                    value: json!("x")
                },
                Operation::Listen {
                    id: EntityId(5),
                    event: "Selection".into(),
                    enabled: true
                },
            ]
        );
        assert!(change_operations(TABLE, EntityId(5), &after, &after).is_empty());
    }

    #[test]
    fn test_missing_base_key_counts_as_changed() {
        let grid = Grid::new("w0", GridStyle::empty());
        let live = capture(TABLE, &grid.view(), &widget());
        let mut base = live.clone();
        base.remove("size");
        let ops = change_operations(TABLE, EntityId(5), &base, &live);
        assert_eq!(
            ops,
            vec![Operation::Set {
                id: EntityId(5),
                property: "size".into(),
                value: json!(0)
            }]
        );
    }

    #[test]
    fn test_read_by_key() {
        let grid = Grid::new("w0", GridStyle::empty());
        let w = Widget { size: 9, ..widget() };
        assert_eq!(read(TABLE, "size", &grid.view(), &w), Some(("size", json!(9))));
        assert_eq!(read(TABLE, "missing", &grid.view(), &w), None);
    }
}
