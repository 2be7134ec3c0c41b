//! Server-side grid model: the authoritative state mirrored to the remote surface.

mod column;
mod grid;
mod item;
mod style;
mod values;

pub use column::{Column, ColumnGroup, MAX_COLUMN_WIDTH};
pub(crate) use grid::{Disposal, ToolTipRequest};
pub use grid::Grid;
pub use item::{Cell, Item};
pub use style::{Alignment, ColumnStyle, GridStyle, GroupStyle, Listeners, SortDirection};
pub use values::{Color, Font, Image};
pub(crate) use values::{opt_color, opt_font, opt_image};
