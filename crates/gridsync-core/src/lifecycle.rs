//! Per-cycle synchronization of a grid with its remote surface.
//!
//! A [`SyncSession`] owns the grid and the snapshot store. Each interaction
//! cycle runs as:
//!
//! 1. [`SyncSession::begin_cycle`] captures the diff base of every known entity.
//! 2. Client input and server code mutate the grid through the [`Cycle`].
//! 3. [`Cycle::render`] emits destroys, creates and changes in a stable order
//!    and commits the live values as the next base.
//!
//! The grid is only reachable mutably through an open cycle, so no mutation
//! can slip in between render and the next capture.

use std::collections::HashSet;

use serde_json::Value;

use crate::diff::{self, Property};
use crate::error::{GridError, GridResult};
use crate::ids::{EntityId, EntityKind};
use crate::input::{self, GridEvent};
use crate::model::Grid;
use crate::props::{CELL_TOOL_TIP_TEXT, COLUMN_PROPERTIES, GRID_PROPERTIES, GROUP_PROPERTIES, ITEM_PROPERTIES};
use crate::protocol::{ClientBatch, ClientMessage, Operation};
use crate::snapshot::SnapshotStore;
use crate::view::GridView;

/// Lifecycle state of an entity as seen from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Exists in the model but has never been rendered.
    Unattached,
    /// Its `Create` went out with the latest render.
    Created,
    /// Diffed by at least one render after its creation.
    Synchronized,
    Disposed,
}

/// Everything one render produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutput {
    pub operations: Vec<Operation>,
    pub events: Vec<GridEvent>,
}

/// Synchronization state for one grid and one remote surface.
#[derive(Debug)]
pub struct SyncSession {
    grid: Grid,
    store: SnapshotStore,
    created: HashSet<EntityId>,
    rendered: u64,
    open: bool,
    terminated: bool,
}

impl SyncSession {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            store: SnapshotStore::new(),
            created: HashSet::new(),
            rendered: 0,
            open: false,
            terminated: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Number of completed renders.
    pub fn rendered_cycles(&self) -> u64 {
        self.rendered
    }

    /// Whether the grid has been disposed and its destruction rendered.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn entity_state(&self, id: EntityId) -> EntityState {
        if self.grid.is_disposed() || self.grid.entity_kind(id).is_none() {
            EntityState::Disposed
        } else if self.created.contains(&id) {
            EntityState::Created
        } else if self.store.contains(id) {
            EntityState::Synchronized
        } else {
            EntityState::Unattached
        }
    }

    /// Start a cycle. A cycle that was dropped without rendering is resumed:
    /// its mutations stay pending against the last committed base.
    pub fn begin_cycle(&mut self) -> GridResult<Cycle<'_>> {
        if self.terminated {
            return Err(GridError::Disposed(self.grid.id()));
        }
        if self.open {
            log::debug!("resuming unrendered cycle {}", self.rendered + 1);
        } else {
            self.preserve();
            self.open = true;
        }
        Ok(Cycle {
            session: self,
            events: Vec::new(),
        })
    }

    fn preserve(&mut self) {
        let grid = &self.grid;
        let view = grid.view();
        let store = &mut self.store;
        capture_known(GRID_PROPERTIES, &view, grid, grid.id(), store);
        for group in grid.column_groups() {
            capture_known(GROUP_PROPERTIES, &view, group, group.id(), store);
        }
        for column in grid.columns() {
            capture_known(COLUMN_PROPERTIES, &view, column, column.id(), store);
        }
        for id in grid.items_pre_order() {
            if let Some(item) = grid.item(id) {
                capture_known(ITEM_PROPERTIES, &view, item, id, store);
            }
        }
    }

    fn render(&mut self) -> Vec<Operation> {
        let mut operations = Vec::new();
        for disposal in self.grid.take_disposals() {
            let known = self.store.discard(disposal.id);
            if known && !disposal.parent_disposing {
                operations.push(Operation::Destroy { id: disposal.id });
            }
        }
        self.open = false;
        self.rendered += 1;
        self.created.clear();
        if self.grid.is_disposed() {
            self.store.clear();
            self.terminated = true;
            return operations;
        }

        let tool_tip = self.grid.take_tool_tip_request();
        let grid = &self.grid;
        let view = grid.view();
        let mut target = RenderTarget {
            store: &mut self.store,
            created: &mut self.created,
            operations: &mut operations,
        };
        target.render(GRID_PROPERTIES, &view, grid, grid.id(), EntityKind::Grid);
        if let Some(request) = tool_tip {
            let text = grid.cell_tool_tip(request.item, request.column).unwrap_or_default();
            target.operations.push(Operation::Set {
                id: grid.id(),
                property: CELL_TOOL_TIP_TEXT.to_string(),
                value: Value::String(text.to_string()),
            });
        }
        for group in grid.column_groups() {
            target.render(GROUP_PROPERTIES, &view, group, group.id(), EntityKind::ColumnGroup);
        }
        for column in grid.columns() {
            target.render(COLUMN_PROPERTIES, &view, column, column.id(), EntityKind::Column);
        }
        for id in grid.items_pre_order() {
            if let Some(item) = grid.item(id) {
                target.render(ITEM_PROPERTIES, &view, item, id, EntityKind::Item);
            }
        }
        log::debug!("cycle {} rendered {} operations", self.rendered, operations.len());
        operations
    }
}

fn capture_known<T>(
    table: &[Property<T>],
    view: &GridView<'_>,
    entity: &T,
    id: EntityId,
    store: &mut SnapshotStore,
) {
    if store.contains(id) {
        store.capture(id, diff::capture(table, view, entity));
    }
}

struct RenderTarget<'a> {
    store: &'a mut SnapshotStore,
    created: &'a mut HashSet<EntityId>,
    operations: &'a mut Vec<Operation>,
}

impl RenderTarget<'_> {
    fn render<T>(&mut self, table: &[Property<T>], view: &GridView<'_>, entity: &T, id: EntityId, kind: EntityKind) {
        let live = diff::capture(table, view, entity);
        match self.store.diff_base(id) {
            Some(base) => self.operations.extend(diff::change_operations(table, id, base, &live)),
            None => {
                self.operations
                    .extend(diff::create_operations(table, view, entity, id, kind, &live));
                self.created.insert(id);
            }
        }
        self.store.commit(id, live);
    }
}

/// An open interaction cycle.
pub struct Cycle<'a> {
    session: &'a mut SyncSession,
    events: Vec<GridEvent>,
}

impl Cycle<'_> {
    pub fn grid(&self) -> &Grid {
        &self.session.grid
    }

    /// Mutable access for server-side changes made during this cycle.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.session.grid
    }

    /// Apply a batch of client messages. A malformed message rejects the
    /// whole batch and leaves the grid untouched.
    pub fn apply(&mut self, messages: &[ClientMessage]) -> GridResult<()> {
        let inputs = input::parse(messages)?;
        let session = &mut *self.session;
        let events = input::apply(&mut session.grid, &mut session.store, inputs)?;
        self.events.extend(events);
        Ok(())
    }

    /// Apply a JSON-encoded [`ClientBatch`].
    pub fn apply_json(&mut self, json: &str) -> GridResult<()> {
        let batch = ClientBatch::from_json(json)?;
        self.apply(&batch.messages)
    }

    /// Events raised so far in this cycle.
    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Diff, emit and commit.
    pub fn render(self) -> CycleOutput {
        let operations = self.session.render();
        CycleOutput {
            operations,
            events: self.events,
        }
    }
}
