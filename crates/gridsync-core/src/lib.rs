//! GridSync Core Library
//!
//! Server-side model of a tree/table grid widget and the machinery that keeps
//! a remote rendering surface in step with it: property snapshots, diffing,
//! the per-cycle lifecycle, column metrics and drag-to-reorder resolution.

pub mod diff;
pub mod error;
pub mod ids;
pub mod input;
pub mod lifecycle;
pub mod metrics;
pub mod model;
pub mod props;
pub mod protocol;
pub mod reorder;
pub mod snapshot;
pub mod theme;
pub mod view;

pub use error::{GridError, GridResult};
pub use ids::{EntityId, EntityKind};
pub use input::{GridEvent, Input};
pub use lifecycle::{Cycle, CycleOutput, EntityState, SyncSession};
pub use metrics::{CellMetrics, ColumnLayout, ColumnSpan};
pub use model::{
    Alignment, Cell, Color, Column, ColumnGroup, ColumnStyle, Font, Grid, GridStyle, GroupStyle, Image, Item,
    Listeners, MAX_COLUMN_WIDTH, SortDirection,
};
pub use protocol::{ClientBatch, ClientMessage, Operation, ServerMessage};
pub use reorder::{MoveOutcome, MoveResolution, ResizeOutcome, move_column, resize_column, resolve_move, target_slot};
pub use snapshot::{Snapshot, SnapshotStore};
pub use theme::GridTheme;
pub use view::GridView;
