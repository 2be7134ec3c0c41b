//! Wire messages exchanged with the remote surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GridResult;
use crate::ids::{EntityId, EntityKind};

/// A server to remote operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create a remote object with its non-default initial properties.
    Create {
        id: EntityId,
        #[serde(rename = "type")]
        kind: EntityKind,
        properties: Map<String, Value>,
    },
    /// Update one property.
    Set {
        id: EntityId,
        property: String,
        value: Value,
    },
    /// Tell the remote side whether the server wants an event.
    Listen {
        id: EntityId,
        event: String,
        enabled: bool,
    },
    /// Destroy a remote object.
    Destroy { id: EntityId },
}

impl Operation {
    /// The entity this operation targets.
    pub fn id(&self) -> EntityId {
        match self {
            Operation::Create { id, .. }
            | Operation::Set { id, .. }
            | Operation::Listen { id, .. }
            | Operation::Destroy { id } => *id,
        }
    }
}

/// A remote to server message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Invoke a method, such as a column `move` or `resize`.
    Call {
        id: EntityId,
        method: String,
        #[serde(default)]
        params: Map<String, Value>,
    },
    /// Report a user event, such as `selection` or `expand`.
    Notify {
        id: EntityId,
        event: String,
        #[serde(default)]
        params: Map<String, Value>,
    },
    /// Report state changed on the remote side.
    Set {
        id: EntityId,
        properties: Map<String, Value>,
    },
}

impl ClientMessage {
    pub fn id(&self) -> EntityId {
        match self {
            ClientMessage::Call { id, .. } | ClientMessage::Notify { id, .. } | ClientMessage::Set { id, .. } => *id,
        }
    }
}

/// All client messages of one interaction cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientBatch {
    pub messages: Vec<ClientMessage>,
}

impl ClientBatch {
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Messages sent to the remote surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Operations produced by one render.
    Operations { cycle: u64, operations: Vec<Operation> },
    /// The client batch was rejected and its cycle discarded.
    Error { message: String },
}

impl ServerMessage {
    pub fn to_json(&self) -> GridResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_serialize() {
        let op = Operation::Set {
            id: EntityId(4),
            property: "width".into(),
            value: json!(40),
        };
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value, json!({"op": "set", "id": "w4", "property": "width", "value": 40}));

        let op = Operation::Create {
            id: EntityId(2),
            kind: EntityKind::Column,
            properties: Map::new(),
        };
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value, json!({"op": "create", "id": "w2", "type": "GridColumn", "properties": {}}));
        assert_eq!(op.id(), EntityId(2));
    }

    #[test]
    fn test_client_batch_deserialize() {
        let batch = ClientBatch::from_json(
            r#"{"messages": [
                {"op": "call", "id": "w3", "method": "move", "params": {"left": 12}},
                {"op": "notify", "id": "w1", "event": "selection"},
                {"op": "set", "id": "w1", "properties": {"scrollLeft": 5}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(batch.messages.len(), 3);
        assert!(matches!(&batch.messages[0], ClientMessage::Call { method, .. } if method == "move"));
        assert!(matches!(&batch.messages[1], ClientMessage::Notify { params, .. } if params.is_empty()));
        assert_eq!(batch.messages[2].id(), EntityId(1));
    }

    #[test]
    fn test_client_batch_rejects_bad_ids() {
        assert!(ClientBatch::from_json(r#"{"messages": [{"op": "notify", "id": "x", "event": "e"}]}"#).is_err());
        assert!(ClientBatch::from_json(r#"{"messages": [{"op": "jump", "id": "w1"}]}"#).is_err());
    }

    #[test]
    fn test_server_message_serialize() {
        let msg = ServerMessage::Operations {
            cycle: 2,
            operations: vec![Operation::Destroy { id: EntityId(7) }],
        };
        let json = msg.to_json().unwrap();
        assert_eq!(json, r#"{"type":"operations","cycle":2,"operations":[{"op":"destroy","id":"w7"}]}"#);
        let err = ServerMessage::Error { message: "bad".into() }.to_json().unwrap();
        assert_eq!(err, r#"{"type":"error","message":"bad"}"#);
    }
}
