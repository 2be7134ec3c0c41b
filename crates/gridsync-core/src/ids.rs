//! Entity identifiers shared by the model and the wire protocol.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a synchronized entity, rendered on the wire as `w<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('w')
            .and_then(|n| n.parse().ok())
            .map(EntityId)
            .ok_or_else(|| format!("invalid entity id: {s:?}"))
    }
}

impl TryFrom<String> for EntityId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

/// The kinds of entity tracked by a synchronization session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Grid,
    #[serde(rename = "GridColumn")]
    Column,
    #[serde(rename = "GridColumnGroup")]
    ColumnGroup,
    #[serde(rename = "GridItem")]
    Item,
}

/// Sequential id source. Identical construction sequences yield identical ids.
#[derive(Debug, Clone)]
pub(crate) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_display_and_parse() {
        let id = EntityId(42);
        assert_eq!(id.to_string(), "w42");
        assert_eq!("w42".parse::<EntityId>(), Ok(id));
        assert!("42".parse::<EntityId>().is_err());
        assert!("wx".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_entity_id_serde() {
        let json = serde_json::to_string(&EntityId(7)).unwrap();
        assert_eq!(json, r#""w7""#);
        let id: EntityId = serde_json::from_str(r#""w9""#).unwrap();
        assert_eq!(id, EntityId(9));
        assert!(serde_json::from_str::<EntityId>("9").is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(serde_json::to_string(&EntityKind::Column).unwrap(), r#""GridColumn""#);
        assert_eq!(serde_json::to_string(&EntityKind::Grid).unwrap(), r#""Grid""#);
    }

    #[test]
    fn test_allocator_is_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), EntityId(1));
        assert_eq!(ids.allocate(), EntityId(2));
    }
}
