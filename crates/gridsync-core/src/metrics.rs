//! Column and cell geometry.
//!
//! Everything here is a pure function of a [`ColumnLayout`] snapshot taken
//! from the grid. Cell metrics feed the `itemMetrics` and `treeMetrics` properties and column
//! spans feed the reorder resolver.

use serde_json::{Value, json};

use crate::theme::GridTheme;

/// Geometry-relevant state of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnGeometry {
    pub width: i32,
    /// Visible and not hidden by its group.
    pub shown: bool,
    pub check: bool,
    /// Some item has an image in this column.
    pub has_image: bool,
}

/// Column widths, order and visibility, plus the grid-wide constants that
/// shape cell content.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Columns in index order.
    pub columns: Vec<ColumnGeometry>,
    /// Display order as a permutation of column indices.
    pub order: Vec<usize>,
    /// Fixed offset before the first column.
    pub leading_offset: i32,
    /// The grid has check boxes in its tree column.
    pub tree_check: bool,
    /// Width at which item images are rendered, 0 when the grid has none.
    pub image_width: i32,
    /// Used as the cell width of a grid without columns.
    pub client_width: i32,
    pub theme: GridTheme,
}

/// Horizontal extent of a column at a display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub index: usize,
    pub position: usize,
    pub left: i32,
    pub width: i32,
    pub shown: bool,
}

impl ColumnSpan {
    pub fn contains(&self, x: i32) -> bool {
        x >= self.left && x <= self.left.saturating_add(self.width)
    }
}

/// Sub-regions of a cell, as rendered in `itemMetrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMetrics {
    pub index: usize,
    pub left: i32,
    pub width: i32,
    pub image_left: i32,
    pub image_width: i32,
    pub text_left: i32,
    pub text_width: i32,
    pub check_left: i32,
    pub check_width: i32,
}

impl CellMetrics {
    /// Wire encoding `[index, left, width, imageLeft, imageWidth, textLeft, textWidth, checkLeft, checkWidth]`.
    pub fn to_value(&self) -> Value {
        json!([
            self.index,
            self.left,
            self.width,
            self.image_left,
            self.image_width,
            self.text_left,
            self.text_width,
            self.check_left,
            self.check_width
        ])
    }
}

impl ColumnLayout {
    /// The first column in display order, which hosts the tree.
    pub fn tree_column(&self) -> Option<usize> {
        self.order.first().copied()
    }

    /// Spans of all columns in display order. Hidden columns get zero width
    /// and do not advance the running offset.
    pub fn spans(&self) -> Vec<ColumnSpan> {
        let mut left = self.leading_offset;
        self.order
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                let column = self.columns.get(index)?;
                let width = if column.shown { column.width } else { 0 };
                let span = ColumnSpan {
                    index,
                    position,
                    left,
                    width,
                    shown: column.shown,
                };
                left = left.saturating_add(width);
                Some(span)
            })
            .collect()
    }

    /// Left offset of a column, 0 for unknown indices.
    pub fn left_of(&self, index: usize) -> i32 {
        self.spans()
            .into_iter()
            .find(|span| span.index == index)
            .map_or(0, |span| span.left)
    }

    /// Total width of all shown columns including the leading offset.
    pub fn total_width(&self) -> i32 {
        self.columns
            .iter()
            .filter(|column| column.shown)
            .fold(self.leading_offset, |total, column| total.saturating_add(column.width))
    }

    /// Left offset and summed width of the shown columns among `members`.
    pub fn bounds_of(&self, members: &[usize]) -> (i32, i32) {
        let spans: Vec<_> = self
            .spans()
            .into_iter()
            .filter(|span| span.shown && members.contains(&span.index))
            .collect();
        let left = spans.iter().map(|span| span.left).min().unwrap_or(0);
        let width = spans.iter().fold(0i32, |total, span| total.saturating_add(span.width));
        (left, width)
    }

    /// Cell metrics for every column in index order, for a root row.
    pub fn cell_metrics(&self) -> Vec<CellMetrics> {
        if self.columns.is_empty() {
            return vec![self.cell(&self.client_span(), true, self.tree_check, self.image_width > 0, 0)];
        }
        let tree = self.tree_column();
        let mut metrics: Vec<CellMetrics> = self
            .spans()
            .iter()
            .map(|span| {
                let column = &self.columns[span.index];
                let is_tree = tree == Some(span.index);
                let check = column.check || (is_tree && self.tree_check);
                self.cell(span, is_tree, check, column.has_image, 0)
            })
            .collect();
        metrics.sort_by_key(|cell| cell.index);
        metrics
    }

    /// Metrics of the tree cell for a row nested `depth` levels deep. Only
    /// the tree column is indented, so other cells match [`Self::cell_metrics`].
    pub fn tree_cell_metrics(&self, depth: usize) -> CellMetrics {
        let Some(tree) = self.tree_column() else {
            return self.cell(&self.client_span(), true, self.tree_check, self.image_width > 0, depth);
        };
        let column = self.columns.get(tree).copied().unwrap_or(ColumnGeometry {
            width: 0,
            shown: false,
            check: false,
            has_image: false,
        });
        let span = self
            .spans()
            .into_iter()
            .find(|span| span.index == tree)
            .unwrap_or(ColumnSpan {
                index: tree,
                position: 0,
                left: self.leading_offset,
                width: 0,
                shown: false,
            });
        self.cell(&span, true, column.check || self.tree_check, column.has_image, depth)
    }

    fn client_span(&self) -> ColumnSpan {
        ColumnSpan {
            index: 0,
            position: 0,
            left: 0,
            width: self.client_width,
            shown: true,
        }
    }

    fn cell(&self, span: &ColumnSpan, is_tree: bool, check: bool, has_image: bool, depth: usize) -> CellMetrics {
        let theme = &self.theme;
        let content_left = if is_tree {
            let depth = i32::try_from(depth).unwrap_or(i32::MAX);
            span.left.saturating_add(depth.saturating_mul(theme.indentation_width))
        } else {
            span.left.saturating_add(theme.cell_padding)
        };
        let (check_left, check_width) = if check {
            (content_left, theme.check_box_width)
        } else {
            (0, 0)
        };
        let image_left = if check {
            check_left.saturating_add(check_width).saturating_add(theme.check_box_gap)
        } else {
            content_left
        };
        let image_width = if has_image { self.image_width } else { 0 };
        let text_left = image_left.saturating_add(image_width);
        let right = span.left.saturating_add(span.width);
        let text_width = right.saturating_sub(text_left).saturating_sub(theme.cell_padding).max(0);
        CellMetrics {
            index: span.index,
            left: span.left,
            width: span.width,
            image_left,
            image_width,
            text_left,
            text_width,
            check_left,
            check_width,
        }
    }
}
