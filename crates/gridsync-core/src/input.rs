//! Reading client messages into the grid model.
//!
//! A batch is parsed into [`Input`] values first; any malformed message
//! rejects the whole batch before the model is touched. Parsed input is then
//! applied in order. Messages for entities that no longer exist are skipped.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::diff;
use crate::error::{GridError, GridResult};
use crate::ids::{EntityId, EntityKind};
use crate::model::Grid;
use crate::props::{GRID_PROPERTIES, ITEM_PROPERTIES};
use crate::protocol::ClientMessage;
use crate::reorder::{self, MoveOutcome, ResizeOutcome};
use crate::snapshot::SnapshotStore;

/// Events raised while applying client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GridEvent {
    Selection {
        item: Option<EntityId>,
        detail: Option<String>,
    },
    DefaultSelection {
        item: Option<EntityId>,
    },
    Expand {
        item: EntityId,
    },
    Collapse {
        item: EntityId,
    },
    ColumnMoved {
        column: EntityId,
    },
    ColumnResized {
        column: EntityId,
    },
    ColumnSelected {
        column: EntityId,
    },
    GroupExpand {
        group: EntityId,
    },
    GroupCollapse {
        group: EntityId,
    },
}

/// A validated client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Move { target: EntityId, left: i32 },
    Resize { target: EntityId, width: i32 },
    Selection {
        target: EntityId,
        item: Option<EntityId>,
        detail: Option<String>,
    },
    DefaultSelection { target: EntityId, item: Option<EntityId> },
    /// `item` is set when a grid row toggles, absent when a group does.
    Expand {
        target: EntityId,
        item: Option<EntityId>,
        expanded: bool,
    },
    ToolTipRequested {
        target: EntityId,
        item: EntityId,
        column: usize,
    },
    SetSelection { target: EntityId, items: Vec<EntityId> },
    SetScrollLeft { target: EntityId, left: i32 },
    SetTopItemIndex { target: EntityId, row: usize },
    SetChecked { target: EntityId, checked: bool },
}

impl Input {
    pub fn target(&self) -> EntityId {
        match self {
            Input::Move { target, .. }
            | Input::Resize { target, .. }
            | Input::Selection { target, .. }
            | Input::DefaultSelection { target, .. }
            | Input::Expand { target, .. }
            | Input::ToolTipRequested { target, .. }
            | Input::SetSelection { target, .. }
            | Input::SetScrollLeft { target, .. }
            | Input::SetTopItemIndex { target, .. }
            | Input::SetChecked { target, .. } => *target,
        }
    }
}

fn int_param(params: &Map<String, Value>, target: EntityId, key: &str) -> GridResult<i64> {
    match params.get(key) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| GridError::malformed(target, key, format!("expected integer, got {value}"))),
        None => Err(GridError::malformed(target, key, "missing")),
    }
}

fn i32_param(params: &Map<String, Value>, target: EntityId, key: &str) -> GridResult<i32> {
    let value = int_param(params, target, key)?;
    i32::try_from(value).map_err(|_| GridError::malformed(target, key, format!("{value} out of range")))
}

fn index_param(params: &Map<String, Value>, target: EntityId, key: &str) -> GridResult<usize> {
    let value = int_param(params, target, key)?;
    usize::try_from(value).map_err(|_| GridError::malformed(target, key, format!("{value} is negative")))
}

fn id_value(value: &Value, target: EntityId, key: &str) -> GridResult<EntityId> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| GridError::malformed(target, key, format!("expected entity id, got {value}")))
}

fn opt_id_param(params: &Map<String, Value>, target: EntityId, key: &str) -> GridResult<Option<EntityId>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => id_value(value, target, key).map(Some),
    }
}

fn id_param(params: &Map<String, Value>, target: EntityId, key: &str) -> GridResult<EntityId> {
    opt_id_param(params, target, key)?.ok_or_else(|| GridError::malformed(target, key, "missing"))
}

fn parse_call(target: EntityId, method: &str, params: &Map<String, Value>) -> GridResult<Option<Input>> {
    Ok(match method {
        "move" => Some(Input::Move {
            target,
            left: i32_param(params, target, "left")?,
        }),
        "resize" => Some(Input::Resize {
            target,
            width: i32_param(params, target, "width")?,
        }),
        _ => {
            log::warn!("ignoring unsupported call {target}.{method}");
            None
        }
    })
}

fn parse_notify(target: EntityId, event: &str, params: &Map<String, Value>) -> GridResult<Option<Input>> {
    Ok(match event {
        "selection" => Some(Input::Selection {
            target,
            item: opt_id_param(params, target, "item")?,
            detail: params.get("detail").and_then(Value::as_str).map(str::to_string),
        }),
        "defaultSelection" => Some(Input::DefaultSelection {
            target,
            item: opt_id_param(params, target, "item")?,
        }),
        "expand" | "collapse" => Some(Input::Expand {
            target,
            item: opt_id_param(params, target, "item")?,
            expanded: event == "expand",
        }),
        "cellToolTipRequested" => Some(Input::ToolTipRequested {
            target,
            item: id_param(params, target, "item")?,
            column: index_param(params, target, "column")?,
        }),
        _ => {
            log::warn!("ignoring unsupported event {target}.{event}");
            None
        }
    })
}

fn parse_set(target: EntityId, properties: &Map<String, Value>, out: &mut Vec<Input>) -> GridResult<()> {
    for (key, value) in properties {
        let input = match key.as_str() {
            "selection" => {
                let ids = value
                    .as_array()
                    .ok_or_else(|| GridError::malformed(target, key, "expected array"))?;
                let items = ids
                    .iter()
                    .map(|id| id_value(id, target, key))
                    .collect::<GridResult<Vec<_>>>()?;
                Input::SetSelection { target, items }
            }
            "scrollLeft" => Input::SetScrollLeft {
                target,
                left: i32_param(properties, target, key)?,
            },
            "topItemIndex" => Input::SetTopItemIndex {
                target,
                row: index_param(properties, target, key)?,
            },
            "checked" => Input::SetChecked {
                target,
                checked: value
                    .as_bool()
                    .ok_or_else(|| GridError::malformed(target, key, format!("expected boolean, got {value}")))?,
            },
            _ => {
                log::warn!("ignoring unsupported property {target}.{key}");
                continue;
            }
        };
        out.push(input);
    }
    Ok(())
}

/// Parse and validate a batch of client messages.
pub fn parse(messages: &[ClientMessage]) -> GridResult<Vec<Input>> {
    let mut inputs = Vec::with_capacity(messages.len());
    for message in messages {
        match message {
            ClientMessage::Call { id, method, params } => inputs.extend(parse_call(*id, method, params)?),
            ClientMessage::Notify { id, event, params } => inputs.extend(parse_notify(*id, event, params)?),
            ClientMessage::Set { id, properties } => parse_set(*id, properties, &mut inputs)?,
        }
    }
    Ok(inputs)
}

/// Remote-held value of a grid property, so the next render does not echo it.
fn record_grid(grid: &Grid, store: &mut SnapshotStore, key: &str) {
    if let Some((key, value)) = diff::read(GRID_PROPERTIES, key, &grid.view(), grid) {
        store.record(grid.id(), key, value);
    }
}

/// Column ids and lefts in display order.
fn column_lefts(grid: &Grid) -> Vec<(EntityId, i32)> {
    grid.layout()
        .spans()
        .iter()
        .filter_map(|span| Some((grid.column_at(span.index)?.id(), span.left)))
        .collect()
}

/// `ColumnMoved` for every column whose left changed, in display order.
fn moved_columns(before: &[(EntityId, i32)], after: &[(EntityId, i32)]) -> Vec<GridEvent> {
    after
        .iter()
        .filter(|(id, left)| !before.iter().any(|(other, old)| other == id && old == left))
        .map(|&(column, _)| GridEvent::ColumnMoved { column })
        .collect()
}

fn invalidate_left(grid: &Grid, store: &mut SnapshotStore, index: usize) {
    if let Some(column) = grid.column_at(index) {
        store.invalidate(column.id(), "left");
    }
}

/// Apply parsed input to the grid, returning the events raised.
pub fn apply(grid: &mut Grid, store: &mut SnapshotStore, inputs: Vec<Input>) -> GridResult<Vec<GridEvent>> {
    let mut events = Vec::new();
    if grid.is_disposed() {
        log::warn!("ignoring {} inputs for disposed grid {}", inputs.len(), grid.id());
        return Ok(events);
    }
    for input in inputs {
        let target = input.target();
        let Some(kind) = grid.entity_kind(target) else {
            log::warn!("ignoring input for unknown or disposed entity {target}");
            continue;
        };
        match (kind, input) {
            (EntityKind::Column, Input::Move { left, .. }) => {
                let Some(index) = grid.index_of_column(target) else { continue };
                let before = column_lefts(grid);
                match reorder::move_column(grid, index, left)? {
                    MoveOutcome::Moved => {
                        // The order changed under the moved column; resend its left even if equal.
                        invalidate_left(grid, store, index);
                        events.extend(moved_columns(&before, &column_lefts(grid)));
                    }
                    MoveOutcome::Rejected => invalidate_left(grid, store, index),
                    MoveOutcome::Unchanged => {
                        for shown in (0..grid.column_count()).filter(|&i| grid.is_column_shown(i)) {
                            invalidate_left(grid, store, shown);
                        }
                    }
                }
            }
            (EntityKind::Column, Input::Resize { width, .. }) => {
                let Some(index) = grid.index_of_column(target) else { continue };
                let before = column_lefts(grid);
                match reorder::resize_column(grid, index, width)? {
                    ResizeOutcome::Resized => {
                        store.record(target, "width", json!(width));
                        events.push(GridEvent::ColumnResized { column: target });
                        events.extend(moved_columns(&before, &column_lefts(grid)));
                    }
                    ResizeOutcome::Rejected => store.invalidate(target, "width"),
                    ResizeOutcome::Unchanged => {}
                }
            }
            (EntityKind::Column, Input::Selection { .. }) => {
                events.push(GridEvent::ColumnSelected { column: target });
            }
            (EntityKind::ColumnGroup, Input::Expand { expanded, .. }) => {
                grid.column_group_mut(target)?.set_expanded(expanded);
                store.record(target, "expanded", json!(expanded));
                events.push(if expanded {
                    GridEvent::GroupExpand { group: target }
                } else {
                    GridEvent::GroupCollapse { group: target }
                });
            }
            (EntityKind::Grid, Input::Selection { item, detail, .. }) => {
                events.push(GridEvent::Selection { item, detail });
            }
            (EntityKind::Grid, Input::DefaultSelection { item, .. }) => {
                events.push(GridEvent::DefaultSelection { item });
            }
            (EntityKind::Grid, Input::Expand { item: Some(item), expanded, .. }) => {
                let Ok(row) = grid.item_mut(item) else {
                    log::warn!("ignoring expand of unknown item {item}");
                    continue;
                };
                row.set_expanded(expanded);
                store.record(item, "expanded", json!(expanded));
                events.push(if expanded {
                    GridEvent::Expand { item }
                } else {
                    GridEvent::Collapse { item }
                });
            }
            (EntityKind::Grid, Input::ToolTipRequested { item, column, .. }) => {
                if let Err(err) = grid.request_cell_tool_tip(item, column) {
                    log::warn!("ignoring tool tip request: {err}");
                }
            }
            (EntityKind::Grid, Input::SetSelection { items, .. }) => {
                grid.set_selection_items(&items)?;
                record_grid(grid, store, "selection");
            }
            (EntityKind::Grid, Input::SetScrollLeft { left, .. }) => {
                grid.set_scroll_left(left)?;
                record_grid(grid, store, "scrollLeft");
            }
            (EntityKind::Grid, Input::SetTopItemIndex { row, .. }) => {
                grid.set_top_visible_row(row)?;
                record_grid(grid, store, "topItemIndex");
            }
            (EntityKind::Item, Input::SetChecked { checked, .. }) => {
                grid.item_mut(target)?.set_checked(checked);
                let value = grid
                    .item(target)
                    .and_then(|item| diff::read(ITEM_PROPERTIES, "checked", &grid.view(), item));
                if let Some((key, value)) = value {
                    store.record(target, key, value);
                }
            }
            (kind, input) => {
                log::warn!("ignoring {input:?} for {kind:?} {target}");
            }
        }
    }
    Ok(events)
}
