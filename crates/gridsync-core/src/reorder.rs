//! Column move and resize reconciliation.
//!
//! The remote side reports where a dragged column header was dropped as a
//! pixel offset. [`resolve_move`] maps that offset to a slot in the display
//! order; [`move_column`] applies the result to the grid, which refuses any
//! order that would split a column group.

use crate::error::{GridError, GridResult};
use crate::metrics::ColumnLayout;
use crate::model::Grid;

/// Result of slot resolution for a pointer position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    /// The column would land where it already is.
    Unchanged,
    /// The display order after the move.
    Reordered(Vec<usize>),
}

/// What happened when a move was applied to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Unchanged,
    /// The new order would split a column group; the grid is untouched.
    Rejected,
}

/// What happened when a resize was applied to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Resized,
    Unchanged,
    /// Width outside `0..=MAX_COLUMN_WIDTH`; the grid is untouched.
    Rejected,
}

/// Display-order slot at which a column dropped at `pointer_x` is inserted.
///
/// Hidden columns are skipped but keep their slot numbers. The first shown
/// column whose `[left, left + width]` contains the pointer wins, and the
/// right half of it promotes the slot by one.
pub fn target_slot(layout: &ColumnLayout, pointer_x: i32) -> usize {
    if pointer_x < 0 {
        return 0;
    }
    layout
        .spans()
        .iter()
        .filter(|span| span.shown)
        .find(|span| span.contains(pointer_x))
        .map_or(layout.order.len(), |span| {
            if pointer_x >= span.left.saturating_add(span.width / 2) {
                span.position + 1
            } else {
                span.position
            }
        })
}

/// Compute the display order after dropping column `moving` at `pointer_x`.
pub fn resolve_move(layout: &ColumnLayout, moving: usize, pointer_x: i32) -> MoveResolution {
    let Some(original) = layout.order.iter().position(|&index| index == moving) else {
        return MoveResolution::Unchanged;
    };
    let mut slot = target_slot(layout, pointer_x);
    let mut order = layout.order.clone();
    order.remove(original);
    if original < slot {
        slot -= 1;
    }
    order.insert(slot.min(order.len()), moving);
    if order == layout.order {
        MoveResolution::Unchanged
    } else {
        MoveResolution::Reordered(order)
    }
}

/// Move a column to the slot under `pointer_x`.
pub fn move_column(grid: &mut Grid, column: usize, pointer_x: i32) -> GridResult<MoveOutcome> {
    GridError::check_index(column, grid.column_count())?;
    match resolve_move(&grid.layout(), column, pointer_x) {
        MoveResolution::Unchanged => Ok(MoveOutcome::Unchanged),
        MoveResolution::Reordered(order) => match grid.set_column_order(&order) {
            Ok(()) => Ok(MoveOutcome::Moved),
            Err(GridError::InvalidColumnOrder(reason)) => {
                log::debug!("column move rejected: {reason}");
                Ok(MoveOutcome::Rejected)
            }
            Err(err) => Err(err),
        },
    }
}

/// Resize a column as reported by the remote side.
pub fn resize_column(grid: &mut Grid, column: usize, width: i32) -> GridResult<ResizeOutcome> {
    let id = grid
        .column_at(column)
        .ok_or(GridError::IndexOutOfRange {
            index: column,
            len: grid.column_count(),
        })?
        .id();
    let target = grid.column_mut(id)?;
    if target.width() == width {
        return Ok(ResizeOutcome::Unchanged);
    }
    match target.set_width(width) {
        Ok(()) => Ok(ResizeOutcome::Resized),
        Err(GridError::InvalidArgument(reason)) => {
            log::debug!("column resize rejected: {reason}");
            Ok(ResizeOutcome::Rejected)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnStyle, GridStyle, GroupStyle};

    fn grid(widths: &[i32]) -> Grid {
        let mut grid = Grid::new("w0", GridStyle::empty());
        for &width in widths {
            let id = grid.create_column(ColumnStyle::empty(), None).unwrap();
            grid.column_mut(id).unwrap().set_width(width).unwrap();
        }
        grid
    }

    fn moved(grid: &mut Grid, column: usize, x: i32) -> Vec<usize> {
        move_column(grid, column, x).unwrap();
        grid.column_order().to_vec()
    }

    #[test]
    fn test_move_into_left_half() {
        let mut grid = grid(&[10, 20, 30]);
        assert_eq!(moved(&mut grid, 1, 3), vec![1, 0, 2]);
    }

    #[test]
    fn test_move_back_into_right_half() {
        let mut grid = grid(&[10, 20, 30]);
        grid.set_column_order(&[1, 0, 2]).unwrap();
        assert_eq!(moved(&mut grid, 1, 27), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_scenarios() {
        let mut g = grid(&[10, 20, 30]);
        assert_eq!(moved(&mut g, 2, 13), vec![0, 2, 1]);
        let mut g = grid(&[10, 20, 30]);
        assert_eq!(moved(&mut g, 2, 3), vec![2, 0, 1]);
        let mut g = grid(&[10, 20, 30]);
        assert_eq!(moved(&mut g, 2, -30), vec![2, 0, 1]);
        let mut g = grid(&[10, 20, 30]);
        assert_eq!(moved(&mut g, 0, 100), vec![1, 2, 0]);
        let mut g = grid(&[10, 20, 30]);
        assert_eq!(moved(&mut g, 0, 33), vec![1, 0, 2]);
    }

    #[test]
    fn test_self_drop_is_unchanged() {
        let mut grid = grid(&[10, 20, 30]);
        assert_eq!(move_column(&mut grid, 1, 13).unwrap(), MoveOutcome::Unchanged);
        assert_eq!(grid.column_order(), &[0, 1, 2]);
    }

    #[test]
    fn test_move_with_hidden_column() {
        let mut grid = grid(&[10, 20, 30, 40]);
        let hidden = grid.column_at(2).unwrap().id();
        grid.column_mut(hidden).unwrap().set_visible(false);
        assert_eq!(moved(&mut grid, 0, 33), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_move_across_group_is_rejected() {
        let mut grid = grid(&[10, 20]);
        let group = grid.create_column_group(GroupStyle::empty()).unwrap();
        for width in [30, 40] {
            let id = grid.create_grouped_column(group, ColumnStyle::empty()).unwrap();
            grid.column_mut(id).unwrap().set_width(width).unwrap();
        }
        assert_eq!(move_column(&mut grid, 0, 55).unwrap(), MoveOutcome::Rejected);
        assert_eq!(grid.column_order(), &[0, 1, 2, 3]);
        assert_eq!(move_column(&mut grid, 3, 15).unwrap(), MoveOutcome::Rejected);
        assert_eq!(grid.column_order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_boundary_pointer_prefers_first_interval() {
        let layout = grid(&[10, 20, 30]).layout();
        // x = 10 is inside both column 0 and column 1; column 0 wins, right half.
        assert_eq!(target_slot(&layout, 10), 1);
        assert_eq!(target_slot(&layout, 60), 3);
        assert_eq!(target_slot(&layout, 61), 3);
        assert_eq!(target_slot(&layout, 0), 0);
    }

    #[test]
    fn test_resolve_move_unknown_column() {
        let layout = grid(&[10]).layout();
        assert_eq!(resolve_move(&layout, 4, 0), MoveResolution::Unchanged);
        let mut g = grid(&[10]);
        assert!(matches!(move_column(&mut g, 4, 0), Err(GridError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_resize() {
        let mut grid = grid(&[10, 20]);
        assert_eq!(resize_column(&mut grid, 0, 25).unwrap(), ResizeOutcome::Resized);
        assert_eq!(grid.columns()[0].width(), 25);
        assert_eq!(resize_column(&mut grid, 0, 25).unwrap(), ResizeOutcome::Unchanged);
        assert_eq!(resize_column(&mut grid, 0, -5).unwrap(), ResizeOutcome::Rejected);
        assert_eq!(resize_column(&mut grid, 1, i32::MAX).unwrap(), ResizeOutcome::Rejected);
        assert_eq!(grid.columns()[0].width(), 25);
        assert_eq!(grid.columns()[1].width(), 20);
        assert!(resize_column(&mut grid, 2, 5).is_err());
    }
}
