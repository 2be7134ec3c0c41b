//! Property-based tests for column reordering and render idempotence.
//!
//! 1. **Permutation** - after any sequence of drops the display order is a
//!    permutation of the column indices.
//!
//! 2. **Group contiguity** - members of a column group stay adjacent and in
//!    index order whatever the pointer positions are.
//!
//! 3. **Self drop** - dropping a column inside its own span never changes
//!    the order.
//!
//! 4. **Idempotent render** - a render with no intervening mutation emits
//!    nothing, and a render after moves emits no creates.

use gridsync_core::{
    ColumnStyle, Grid, GridStyle, GroupStyle, MoveOutcome, Operation, SyncSession, move_column,
};
use proptest::prelude::*;

/// Build a grid with `widths.len()` columns. When `group_range` is set, the
/// columns in that half-open index range belong to one group.
fn build_grid(widths: &[i32], group_range: Option<(usize, usize)>, hidden: &[bool]) -> Grid {
    let mut grid = Grid::new("w0", GridStyle::MULTI);
    let group = group_range.map(|_| grid.create_column_group(GroupStyle::empty()).unwrap());
    for (index, &width) in widths.iter().enumerate() {
        let in_group = group_range.is_some_and(|(start, end)| index >= start && index < end);
        let id = match group {
            Some(group) if in_group => grid.create_grouped_column(group, ColumnStyle::empty()).unwrap(),
            _ => grid.create_column(ColumnStyle::empty(), None).unwrap(),
        };
        let column = grid.column_mut(id).unwrap();
        column.set_width(width).unwrap();
        if hidden.get(index).copied().unwrap_or(false) {
            column.set_visible(false);
        }
    }
    grid
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    sorted == (0..len).collect::<Vec<_>>()
}

fn group_is_contiguous(grid: &Grid) -> bool {
    grid.column_groups().iter().all(|group| {
        let positions: Vec<usize> = grid
            .group_members(group.id())
            .iter()
            .filter_map(|&member| grid.column_order().iter().position(|&entry| entry == member))
            .collect();
        positions.windows(2).all(|pair| pair[1] == pair[0] + 1)
    })
}

fn widths_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(0i32..120, 1..8)
}

fn moves_strategy() -> impl Strategy<Value = Vec<(usize, i32)>> {
    prop::collection::vec((0usize..8, -20i32..900), 0..24)
}

proptest! {
    #[test]
    fn order_stays_a_permutation(
        widths in widths_strategy(),
        hidden in prop::collection::vec(any::<bool>(), 0..8),
        moves in moves_strategy(),
    ) {
        let mut grid = build_grid(&widths, None, &hidden);
        let len = widths.len();
        for (column, x) in moves {
            let outcome = move_column(&mut grid, column % len, x).unwrap();
            prop_assert_ne!(outcome, MoveOutcome::Rejected);
            prop_assert!(is_permutation(grid.column_order(), len));
        }
    }

    #[test]
    fn groups_stay_contiguous(
        widths in prop::collection::vec(1i32..120, 3..8),
        start in 0usize..3,
        span in 2usize..4,
        moves in moves_strategy(),
    ) {
        let len = widths.len();
        let start = start.min(len - 2);
        let end = (start + span).min(len);
        let mut grid = build_grid(&widths, Some((start, end)), &[]);
        prop_assert!(group_is_contiguous(&grid));
        for (column, x) in moves {
            let before = grid.column_order().to_vec();
            let outcome = move_column(&mut grid, column % len, x).unwrap();
            prop_assert!(is_permutation(grid.column_order(), len));
            prop_assert!(group_is_contiguous(&grid));
            if outcome != MoveOutcome::Moved {
                prop_assert_eq!(grid.column_order(), &before[..]);
            }
        }
    }

    #[test]
    fn self_drop_is_unchanged(
        widths in prop::collection::vec(2i32..120, 1..8),
        column in 0usize..8,
        offset in 0i32..120,
    ) {
        let mut grid = build_grid(&widths, None, &[]);
        let column = column % widths.len();
        let left = grid.column_left(column);
        let width = widths[column];
        // Left half of the column maps back to its own slot.
        let x = left + offset % (width / 2);
        let before = grid.column_order().to_vec();
        prop_assert_eq!(move_column(&mut grid, column, x).unwrap(), MoveOutcome::Unchanged);
        prop_assert_eq!(grid.column_order(), &before[..]);
    }

    #[test]
    fn render_is_idempotent(
        widths in widths_strategy(),
        items in 0usize..6,
        moves in moves_strategy(),
    ) {
        let mut grid = build_grid(&widths, None, &[]);
        grid.set_item_count(items).unwrap();
        let len = widths.len();
        let mut session = SyncSession::new(grid);
        session.begin_cycle().unwrap().render();
        prop_assert!(session.begin_cycle().unwrap().render().operations.is_empty());

        let mut cycle = session.begin_cycle().unwrap();
        for (column, x) in moves {
            move_column(cycle.grid_mut(), column % len, x).unwrap();
        }
        let operations = cycle.render().operations;
        let is_create = |op: &Operation| matches!(op, Operation::Create { .. });
        prop_assert!(!operations.iter().any(is_create));
        prop_assert!(session.begin_cycle().unwrap().render().operations.is_empty());
    }
}
