//! Property tables of the synchronized entity types.

mod column;
mod grid;
mod group;
mod item;

pub use column::COLUMN_PROPERTIES;
pub use grid::{CELL_TOOL_TIP_TEXT, GRID_PROPERTIES};
pub use group::GROUP_PROPERTIES;
pub use item::ITEM_PROPERTIES;

use serde_json::Value;

use crate::ids::EntityId;

pub(crate) fn opt_id(id: Option<EntityId>) -> Value {
    id.map_or(Value::Null, |id| Value::String(id.to_string()))
}
