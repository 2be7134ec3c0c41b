//! Tree items and their per-column cells.

use crate::error::{GridError, GridResult};
use crate::ids::EntityId;

use super::values::{Color, Font, Image};

/// Per-column data of an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    pub image: Option<Image>,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub font: Option<Font>,
    pub tool_tip: Option<String>,
}

/// A row of the grid. Items form a forest rooted at the grid.
#[derive(Debug, Clone)]
pub struct Item {
    pub(crate) id: EntityId,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) level: usize,
    /// One cell per column, and at least one.
    pub(crate) cells: Vec<Cell>,
    pub(crate) background: Option<Color>,
    pub(crate) foreground: Option<Color>,
    pub(crate) font: Option<Font>,
    pub(crate) checked: bool,
    pub(crate) grayed: bool,
    pub(crate) expanded: bool,
}

impl Item {
    pub(crate) fn new(id: EntityId, parent: Option<EntityId>, level: usize, cell_count: usize) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            level,
            cells: vec![Cell::default(); cell_count.max(1)],
            background: None,
            foreground: None,
            font: None,
            checked: false,
            grayed: false,
            expanded: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Parent item, or `None` for a root item.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn item_count(&self) -> usize {
        self.children.len()
    }

    /// Nesting depth; root items are at level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    pub fn text(&self, column: usize) -> &str {
        self.cells.get(column).map_or("", |cell| cell.text.as_str())
    }

    /// Set the text of one cell.
    pub fn set_text(&mut self, column: usize, text: impl Into<String>) -> GridResult<()> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(column)
            .ok_or(GridError::IndexOutOfRange { index: column, len })?;
        cell.text = text.into();
        Ok(())
    }

    pub fn image(&self, column: usize) -> Option<&Image> {
        self.cells.get(column).and_then(|cell| cell.image.as_ref())
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn set_foreground(&mut self, color: Option<Color>) {
        self.foreground = color;
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font;
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn is_grayed(&self) -> bool {
        self.grayed
    }

    pub fn set_grayed(&mut self, grayed: bool) {
        self.grayed = grayed;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Whether any cell carries a tool tip.
    pub fn has_cell_tool_tip(&self) -> bool {
        self.cells.iter().any(|cell| cell.tool_tip.is_some())
    }

    /// Reset cell contents, colors, fonts and check state.
    pub(crate) fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
        self.background = None;
        self.foreground = None;
        self.font = None;
        self.checked = false;
        self.grayed = false;
    }

    pub(crate) fn insert_cell(&mut self, index: usize, column_count_before: usize) {
        // The lone cell of a column-less grid becomes the first column's cell.
        if column_count_before > 0 {
            self.cells.insert(index, Cell::default());
        }
    }

    pub(crate) fn remove_cell(&mut self, index: usize) {
        if self.cells.len() > 1 {
            self.cells.remove(index);
        } else if let Some(cell) = self.cells.first_mut() {
            *cell = Cell::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_has_at_least_one_cell() {
        let item = Item::new(EntityId(1), None, 0, 0);
        assert_eq!(item.cells().len(), 1);
        assert_eq!(item.text(0), "");
        assert_eq!(item.text(5), "");
    }

    #[test]
    fn test_cell_insert_and_remove() {
        let mut item = Item::new(EntityId(1), None, 0, 0);
        item.cell_mut(0).unwrap().text = "first".into();
        item.insert_cell(0, 0);
        assert_eq!(item.cells().len(), 1);
        item.insert_cell(0, 1);
        assert_eq!(item.cells().len(), 2);
        assert_eq!(item.text(1), "first");
        item.remove_cell(1);
        item.remove_cell(0);
        assert_eq!(item.cells().len(), 1);
    }

    #[test]
    fn test_set_text_out_of_range() {
        let mut item = Item::new(EntityId(1), None, 0, 2);
        item.set_text(1, "b").unwrap();
        assert_eq!(item.text(1), "b");
        assert!(matches!(
            item.set_text(2, "c"),
            Err(GridError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_clear() {
        let mut item = Item::new(EntityId(1), None, 0, 2);
        item.cell_mut(1).unwrap().text = "x".into();
        item.set_checked(true);
        item.set_background(Some(Color::rgb(1, 1, 1)));
        item.set_expanded(true);
        item.clear();
        assert_eq!(item.text(1), "");
        assert!(!item.is_checked());
        assert!(item.background().is_none());
        assert!(item.is_expanded());
    }
}
