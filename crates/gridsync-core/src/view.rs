//! Read access to a grid with its column geometry computed once.
//!
//! Property readers run once per property per entity during a render, and
//! several of them need column positions. A [`GridView`] takes the
//! [`ColumnLayout`] snapshot on first use and keeps it, so a pass over all
//! entities stays linear in the number of items.

use std::cell::OnceCell;
use std::ops::Deref;

use crate::ids::EntityId;
use crate::metrics::{ColumnLayout, ColumnSpan};
use crate::model::Grid;

/// A grid borrowed for one render or capture pass.
pub struct GridView<'a> {
    grid: &'a Grid,
    geometry: OnceCell<(ColumnLayout, Vec<ColumnSpan>)>,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            geometry: OnceCell::new(),
        }
    }

    fn geometry(&self) -> &(ColumnLayout, Vec<ColumnSpan>) {
        self.geometry.get_or_init(|| {
            let layout = self.grid.layout();
            let spans = layout.spans();
            (layout, spans)
        })
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.geometry().0
    }

    /// Column spans in display order.
    pub fn spans(&self) -> &[ColumnSpan] {
        &self.geometry().1
    }

    /// Left offset of a column, 0 for unknown indices.
    pub fn column_left(&self, index: usize) -> i32 {
        self.spans()
            .iter()
            .find(|span| span.index == index)
            .map_or(0, |span| span.left)
    }

    pub fn group_bounds(&self, group: EntityId) -> (i32, i32) {
        self.layout().bounds_of(&self.grid.group_members(group))
    }

    pub fn scroll_bars_visible(&self) -> (bool, bool) {
        self.grid.scroll_bars_for(self.layout())
    }
}

impl Deref for GridView<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnStyle, GridStyle, GroupStyle};

    #[test]
    fn test_view_matches_grid_geometry() {
        let mut grid = Grid::new("w0", GridStyle::H_SCROLL);
        grid.set_size(100, 100).unwrap();
        let first = grid.create_column(ColumnStyle::empty(), None).unwrap();
        grid.column_mut(first).unwrap().set_width(30).unwrap();
        let group = grid.create_column_group(GroupStyle::empty()).unwrap();
        for width in [40, 50] {
            let id = grid.create_grouped_column(group, ColumnStyle::empty()).unwrap();
            grid.column_mut(id).unwrap().set_width(width).unwrap();
        }
        grid.set_column_order(&[1, 2, 0]).unwrap();

        let view = grid.view();
        assert!(view.geometry.get().is_none());
        for index in 0..3 {
            assert_eq!(view.column_left(index), grid.column_left(index));
        }
        assert_eq!(view.column_left(0), 90);
        assert_eq!(view.group_bounds(group), grid.group_bounds(group));
        assert_eq!(view.group_bounds(group), (0, 90));
        assert_eq!(view.scroll_bars_visible(), grid.scroll_bars_visible());
        assert_eq!(view.scroll_bars_visible(), (true, false));
        assert_eq!(view.spans().len(), 3);
        assert_eq!(view.column_count(), 3);
        assert!(view.geometry.get().is_some());
    }
}
