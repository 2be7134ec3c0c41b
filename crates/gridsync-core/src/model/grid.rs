//! The grid root entity.
//!
//! The grid owns every column, column group and item. All mutation goes
//! through it so that structural invariants hold at every step: the display
//! order is a permutation of the column indices, group members stay
//! contiguous, and every item has one cell per column.

use std::collections::{HashMap, HashSet};

use crate::error::{GridError, GridResult};
use crate::ids::{EntityId, EntityKind, IdAllocator};
use crate::metrics::{ColumnGeometry, ColumnLayout};
use crate::theme::GridTheme;
use crate::view::GridView;

use super::column::{Column, ColumnGroup};
use super::item::Item;
use super::style::{ColumnStyle, GridStyle, GroupStyle, Listeners, SortDirection};
use super::values::Image;

/// A disposal recorded since the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Disposal {
    pub id: EntityId,
    pub kind: EntityKind,
    /// The entity went away together with its parent.
    pub parent_disposing: bool,
}

/// A pending request for the tool tip of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ToolTipRequest {
    pub item: EntityId,
    pub column: usize,
}

/// A tree-structured table of items and columns.
#[derive(Debug, Clone)]
pub struct Grid {
    id: EntityId,
    parent: String,
    style: GridStyle,
    theme: GridTheme,
    ids: IdAllocator,
    columns: Vec<Column>,
    order: Vec<usize>,
    groups: Vec<ColumnGroup>,
    items: HashMap<EntityId, Item>,
    roots: Vec<EntityId>,
    selection: Vec<EntityId>,
    selection_enabled: bool,
    focus: Option<EntityId>,
    top_index: usize,
    scroll_left: i32,
    width: i32,
    height: i32,
    item_height: i32,
    header_visible: bool,
    footer_visible: bool,
    lines_visible: bool,
    row_header_width: i32,
    item_image_size: Option<(i32, i32)>,
    listeners: Listeners,
    scroll_bar_listener: bool,
    tool_tip_request: Option<ToolTipRequest>,
    disposed: bool,
    disposals: Vec<Disposal>,
    /// Every column, group and item disposed so far.
    retired: HashSet<EntityId>,
}

/// `Disposed` for an entity that existed once, `UnknownEntity` otherwise.
fn missing_entity(retired: &HashSet<EntityId>, id: EntityId) -> GridError {
    if retired.contains(&id) {
        GridError::Disposed(id)
    } else {
        GridError::UnknownEntity(id)
    }
}

impl Grid {
    /// Create a grid attached to a remote parent container.
    pub fn new(parent: impl Into<String>, style: GridStyle) -> Self {
        Self::with_theme(parent, style, GridTheme::default())
    }

    pub fn with_theme(parent: impl Into<String>, style: GridStyle, theme: GridTheme) -> Self {
        let mut ids = IdAllocator::new();
        let id = ids.allocate();
        Self {
            id,
            parent: parent.into(),
            style,
            item_height: theme.item_height,
            theme,
            ids,
            columns: Vec::new(),
            order: Vec::new(),
            groups: Vec::new(),
            items: HashMap::new(),
            roots: Vec::new(),
            selection: Vec::new(),
            selection_enabled: true,
            focus: None,
            top_index: 0,
            scroll_left: 0,
            width: 0,
            height: 0,
            header_visible: false,
            footer_visible: false,
            lines_visible: false,
            row_header_width: 0,
            item_image_size: None,
            listeners: Listeners::empty(),
            scroll_bar_listener: false,
            tool_tip_request: None,
            disposed: false,
            disposals: Vec::new(),
            retired: HashSet::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Id of the remote container hosting the grid.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn style(&self) -> GridStyle {
        self.style
    }

    pub fn theme(&self) -> &GridTheme {
        &self.theme
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_alive(&self) -> GridResult<()> {
        if self.disposed {
            Err(GridError::Disposed(self.id))
        } else {
            Ok(())
        }
    }

    /// Dispose the grid and, implicitly, everything it owns.
    pub fn dispose(&mut self) -> GridResult<()> {
        self.ensure_alive()?;
        self.disposed = true;
        self.disposals.push(Disposal {
            id: self.id,
            kind: EntityKind::Grid,
            parent_disposing: false,
        });
        Ok(())
    }

    /// Kind of a live entity owned by this grid.
    pub fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
        if id == self.id {
            Some(EntityKind::Grid)
        } else if self.items.contains_key(&id) {
            Some(EntityKind::Item)
        } else if self.column(id).is_some() {
            Some(EntityKind::Column)
        } else if self.column_group(id).is_some() {
            Some(EntityKind::ColumnGroup)
        } else {
            None
        }
    }

    pub(crate) fn take_disposals(&mut self) -> Vec<Disposal> {
        std::mem::take(&mut self.disposals)
    }

    // --- Size and appearance ---

    /// Set the client area size.
    pub fn set_size(&mut self, width: i32, height: i32) -> GridResult<()> {
        self.ensure_alive()?;
        self.width = width.max(0);
        self.height = height.max(0);
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn item_height(&self) -> i32 {
        self.item_height
    }

    pub fn set_item_height(&mut self, height: i32) -> GridResult<()> {
        self.ensure_alive()?;
        if height < 0 {
            return Err(GridError::InvalidArgument(format!("negative item height {height}")));
        }
        self.item_height = height;
        Ok(())
    }

    pub fn is_header_visible(&self) -> bool {
        self.header_visible
    }

    pub fn set_header_visible(&mut self, visible: bool) -> GridResult<()> {
        self.ensure_alive()?;
        self.header_visible = visible;
        Ok(())
    }

    pub fn is_footer_visible(&self) -> bool {
        self.footer_visible
    }

    pub fn set_footer_visible(&mut self, visible: bool) -> GridResult<()> {
        self.ensure_alive()?;
        self.footer_visible = visible;
        Ok(())
    }

    /// Header height, including the group header row when groups exist.
    pub fn header_height(&self) -> i32 {
        if !self.header_visible {
            return 0;
        }
        if self.groups.is_empty() {
            self.theme.header_height
        } else {
            self.theme.header_height + self.theme.group_header_height
        }
    }

    pub fn footer_height(&self) -> i32 {
        if self.footer_visible { self.theme.footer_height } else { 0 }
    }

    pub fn is_lines_visible(&self) -> bool {
        self.lines_visible
    }

    pub fn set_lines_visible(&mut self, visible: bool) -> GridResult<()> {
        self.ensure_alive()?;
        self.lines_visible = visible;
        Ok(())
    }

    pub fn row_header_width(&self) -> i32 {
        self.row_header_width
    }

    pub fn set_row_header_width(&mut self, width: i32) -> GridResult<()> {
        self.ensure_alive()?;
        if width < 0 {
            return Err(GridError::InvalidArgument(format!("negative row header width {width}")));
        }
        self.row_header_width = width;
        Ok(())
    }

    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    pub fn set_listener(&mut self, kind: Listeners, enabled: bool) -> GridResult<()> {
        self.ensure_alive()?;
        self.listeners.set(kind, enabled);
        Ok(())
    }

    pub fn has_scroll_bar_listener(&self) -> bool {
        self.scroll_bar_listener
    }

    pub fn set_scroll_bar_listener(&mut self, enabled: bool) -> GridResult<()> {
        self.ensure_alive()?;
        self.scroll_bar_listener = enabled;
        Ok(())
    }

    // --- Columns ---

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, id: EntityId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    pub fn column_mut(&mut self, id: EntityId) -> GridResult<&mut Column> {
        self.ensure_alive()?;
        self.columns
            .iter_mut()
            .find(|column| column.id == id)
            .ok_or_else(|| missing_entity(&self.retired, id))
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn index_of_column(&self, id: EntityId) -> Option<usize> {
        self.columns.iter().position(|column| column.id == id)
    }

    /// Create an ungrouped column at `index`, or at the end.
    pub fn create_column(&mut self, style: ColumnStyle, index: Option<usize>) -> GridResult<EntityId> {
        self.ensure_alive()?;
        let len = self.columns.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(GridError::IndexOutOfRange { index, len });
        }
        Ok(self.insert_column(style, index, None, index))
    }

    /// Create a column at the end of a group.
    pub fn create_grouped_column(&mut self, group: EntityId, style: ColumnStyle) -> GridResult<EntityId> {
        self.ensure_alive()?;
        if self.column_group(group).is_none() {
            return Err(missing_entity(&self.retired, group));
        }
        let (index, position) = match self.group_members(group).last() {
            Some(&last) => (last + 1, self.display_position(last).map_or(self.order.len(), |p| p + 1)),
            None => (self.columns.len(), self.order.len()),
        };
        Ok(self.insert_column(style, index, Some(group), position))
    }

    fn insert_column(
        &mut self,
        style: ColumnStyle,
        index: usize,
        group: Option<EntityId>,
        position: usize,
    ) -> EntityId {
        let id = self.ids.allocate();
        let count_before = self.columns.len();
        self.columns.insert(index, Column::new(id, style, group));
        for entry in &mut self.order {
            if *entry >= index {
                *entry += 1;
            }
        }
        let mut order = self.order.clone();
        order.insert(position.min(order.len()), index);
        if self.validate_order(&order).is_err() {
            // Never split a group: fall back to the end of the display order.
            order.retain(|&entry| entry != index);
            order.push(index);
        }
        self.order = order;
        for item in self.items.values_mut() {
            item.insert_cell(index, count_before);
        }
        id
    }

    /// Dispose a column. Higher indices shift down by one.
    pub fn dispose_column(&mut self, id: EntityId) -> GridResult<()> {
        self.ensure_alive()?;
        let index = self.index_of_column(id).ok_or_else(|| missing_entity(&self.retired, id))?;
        self.columns.remove(index);
        self.order.retain(|&entry| entry != index);
        for entry in &mut self.order {
            if *entry > index {
                *entry -= 1;
            }
        }
        for item in self.items.values_mut() {
            item.remove_cell(index);
        }
        if self.tool_tip_request.is_some_and(|request| request.column >= self.columns.len().max(1)) {
            self.tool_tip_request = None;
        }
        self.retired.insert(id);
        self.disposals.push(Disposal {
            id,
            kind: EntityKind::Column,
            parent_disposing: false,
        });
        Ok(())
    }

    /// Display order as a permutation of column indices.
    pub fn column_order(&self) -> &[usize] {
        &self.order
    }

    /// Replace the display order. Rejected orders leave the grid unchanged.
    pub fn set_column_order(&mut self, order: &[usize]) -> GridResult<()> {
        self.ensure_alive()?;
        self.validate_order(order)?;
        self.order = order.to_vec();
        Ok(())
    }

    fn validate_order(&self, order: &[usize]) -> GridResult<()> {
        let len = self.columns.len();
        if order.len() != len {
            return Err(GridError::InvalidColumnOrder(format!(
                "expected {len} entries, got {}",
                order.len()
            )));
        }
        let mut seen = vec![false; len];
        for &index in order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(GridError::InvalidColumnOrder(format!("duplicate index {index}"))),
                None => return Err(GridError::InvalidColumnOrder(format!("index {index} out of range"))),
            }
        }
        for group in &self.groups {
            let positions: Vec<usize> = self
                .group_members(group.id)
                .iter()
                .filter_map(|&member| order.iter().position(|&entry| entry == member))
                .collect();
            if positions.windows(2).any(|pair| pair[1] != pair[0] + 1) {
                return Err(GridError::InvalidColumnOrder(format!(
                    "columns of group {} must stay contiguous and in order",
                    group.id
                )));
            }
        }
        Ok(())
    }

    fn display_position(&self, index: usize) -> Option<usize> {
        self.order.iter().position(|&entry| entry == index)
    }

    /// Whether a column takes horizontal space: visible and not hidden by its group.
    pub fn is_column_shown(&self, index: usize) -> bool {
        let Some(column) = self.columns.get(index) else {
            return false;
        };
        let group_shows = column
            .group
            .and_then(|group| self.column_group(group))
            .is_none_or(|group| group.shows(column));
        column.visible && group_shows
    }

    /// Snapshot of the column geometry for metric computations.
    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout {
            columns: (0..self.columns.len())
                .map(|index| ColumnGeometry {
                    width: self.columns[index].width,
                    shown: self.is_column_shown(index),
                    check: self.columns[index].is_check(),
                    has_image: self.column_has_images(index),
                })
                .collect(),
            order: self.order.clone(),
            leading_offset: self.row_header_width,
            tree_check: self.style.contains(GridStyle::CHECK),
            image_width: self.item_image_size.map_or(0, |(width, _)| width),
            client_width: self.width,
            theme: self.theme.clone(),
        }
    }

    /// Borrow the grid together with a layout computed once.
    pub fn view(&self) -> GridView<'_> {
        GridView::new(self)
    }

    /// Left offset of a column in the current layout.
    pub fn column_left(&self, index: usize) -> i32 {
        self.layout().left_of(index)
    }

    /// Index of the tree column: the first column in display order.
    pub fn tree_column(&self) -> usize {
        self.order.first().copied().unwrap_or(0)
    }

    /// The column showing a sort indicator, if any.
    pub fn sort_column(&self) -> Option<&Column> {
        self.columns.iter().find(|column| column.sort != SortDirection::None)
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_column().map_or(SortDirection::None, |column| column.sort)
    }

    // --- Column groups ---

    pub fn column_groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn column_group(&self, id: EntityId) -> Option<&ColumnGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn column_group_mut(&mut self, id: EntityId) -> GridResult<&mut ColumnGroup> {
        self.ensure_alive()?;
        self.groups
            .iter_mut()
            .find(|group| group.id == id)
            .ok_or_else(|| missing_entity(&self.retired, id))
    }

    pub fn create_column_group(&mut self, style: GroupStyle) -> GridResult<EntityId> {
        self.ensure_alive()?;
        let id = self.ids.allocate();
        self.groups.push(ColumnGroup::new(id, style));
        Ok(id)
    }

    /// Member column indices of a group, in index order.
    pub fn group_members(&self, group: EntityId) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.group == Some(group))
            .map(|(index, _)| index)
            .collect()
    }

    /// Left offset and width spanned by the shown members of a group.
    pub fn group_bounds(&self, group: EntityId) -> (i32, i32) {
        self.layout().bounds_of(&self.group_members(group))
    }

    /// Dispose a group together with its member columns.
    pub fn dispose_column_group(&mut self, id: EntityId) -> GridResult<()> {
        self.ensure_alive()?;
        let position = self
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| missing_entity(&self.retired, id))?;
        for index in self.group_members(id).into_iter().rev() {
            let column = self.columns[index].id;
            self.dispose_column(column)?;
        }
        self.groups.remove(position);
        self.retired.insert(id);
        self.disposals.push(Disposal {
            id,
            kind: EntityKind::ColumnGroup,
            parent_disposing: false,
        });
        Ok(())
    }

    // --- Items ---

    pub fn item(&self, id: EntityId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: EntityId) -> GridResult<&mut Item> {
        self.ensure_alive()?;
        self.items.get_mut(&id).ok_or_else(|| missing_entity(&self.retired, id))
    }

    pub fn root_items(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn root_item_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of items at every level.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Create an item under `parent` (or at the root) at a sibling index.
    pub fn create_item(&mut self, parent: Option<EntityId>, index: Option<usize>) -> GridResult<EntityId> {
        self.ensure_alive()?;
        let level = match parent {
            Some(parent) => self.item(parent).ok_or_else(|| missing_entity(&self.retired, parent))?.level + 1,
            None => 0,
        };
        let len = self.siblings(parent).len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(GridError::IndexOutOfRange { index, len });
        }
        let id = self.ids.allocate();
        self.items.insert(id, Item::new(id, parent, level, self.columns.len()));
        match parent {
            Some(parent) => {
                if let Some(parent) = self.items.get_mut(&parent) {
                    parent.children.insert(index, id);
                }
            }
            None => self.roots.insert(index, id),
        }
        Ok(id)
    }

    fn siblings(&self, parent: Option<EntityId>) -> &[EntityId] {
        match parent.and_then(|parent| self.items.get(&parent)) {
            Some(parent) => &parent.children,
            None => &self.roots,
        }
    }

    /// Position of an item among its siblings.
    pub fn sibling_index(&self, id: EntityId) -> Option<usize> {
        let item = self.item(id)?;
        self.siblings(item.parent).iter().position(|&sibling| sibling == id)
    }

    /// All items in pre-order, regardless of expanded state.
    pub fn items_pre_order(&self) -> Vec<EntityId> {
        self.walk(false)
    }

    /// Items on visible rows: children of collapsed items are skipped.
    pub fn visible_rows(&self) -> Vec<EntityId> {
        self.walk(true)
    }

    fn walk(&self, visible_only: bool) -> Vec<EntityId> {
        let mut out = Vec::with_capacity(self.items.len());
        let mut stack: Vec<EntityId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(item) = self.items.get(&id) {
                if !visible_only || item.expanded {
                    stack.extend(item.children.iter().rev());
                }
            }
        }
        out
    }

    /// Item at a flat pre-order index.
    pub fn item_at(&self, index: usize) -> Option<EntityId> {
        self.items_pre_order().get(index).copied()
    }

    /// Flat pre-order index of an item.
    pub fn index_of_item(&self, id: EntityId) -> Option<usize> {
        self.items_pre_order().iter().position(|&item| item == id)
    }

    /// Dispose an item and its descendants.
    pub fn dispose_item(&mut self, id: EntityId) -> GridResult<()> {
        self.ensure_alive()?;
        let item = self.items.get(&id).ok_or_else(|| missing_entity(&self.retired, id))?;
        let parent = item.parent;
        let mut subtree = vec![id];
        let mut cursor = 0;
        while cursor < subtree.len() {
            if let Some(item) = self.items.get(&subtree[cursor]) {
                subtree.extend(item.children.iter().copied());
            }
            cursor += 1;
        }
        match parent.and_then(|parent| self.items.get_mut(&parent)) {
            Some(parent) => parent.children.retain(|&child| child != id),
            None => self.roots.retain(|&root| root != id),
        }
        for (position, disposed) in subtree.iter().enumerate() {
            self.items.remove(disposed);
            self.retired.insert(*disposed);
            self.disposals.push(Disposal {
                id: *disposed,
                kind: EntityKind::Item,
                parent_disposing: position > 0,
            });
        }
        self.selection.retain(|selected| !subtree.contains(selected));
        if self.focus.is_some_and(|focus| subtree.contains(&focus)) {
            self.focus = None;
        }
        if self.tool_tip_request.is_some_and(|request| subtree.contains(&request.item)) {
            self.tool_tip_request = None;
        }
        self.top_index = self.top_index.min(self.items.len().saturating_sub(1));
        Ok(())
    }

    /// Populate or trim root items to `count`, as a virtual grid does.
    pub fn set_item_count(&mut self, count: usize) -> GridResult<()> {
        self.ensure_alive()?;
        while self.roots.len() < count {
            self.create_item(None, None)?;
        }
        while self.roots.len() > count {
            if let Some(&last) = self.roots.last() {
                self.dispose_item(last)?;
            }
        }
        Ok(())
    }

    fn clear_item(&mut self, id: EntityId, all_children: bool) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(item) = self.items.get_mut(&current) {
                item.clear();
                if all_children {
                    pending.extend(item.children.iter().copied());
                }
            }
        }
    }

    /// Clear the item at a flat index, and optionally its descendants.
    pub fn clear(&mut self, index: usize, all_children: bool) -> GridResult<()> {
        self.ensure_alive()?;
        let id = self.item_at(index).ok_or(GridError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })?;
        self.clear_item(id, all_children);
        Ok(())
    }

    /// Clear items in the inclusive flat range. `start > end` is a no-op.
    pub fn clear_range(&mut self, start: usize, end: usize, all_children: bool) -> GridResult<()> {
        self.ensure_alive()?;
        if start > end {
            return Ok(());
        }
        let items = self.items_pre_order();
        GridError::check_index(end, items.len())?;
        for &id in &items[start..=end] {
            self.clear_item(id, all_children);
        }
        Ok(())
    }

    /// Clear items at the given flat indices. Nothing is cleared if any index is invalid.
    pub fn clear_indices(&mut self, indices: &[usize], all_children: bool) -> GridResult<()> {
        self.ensure_alive()?;
        let items = self.items_pre_order();
        for &index in indices {
            GridError::check_index(index, items.len())?;
        }
        for &index in indices {
            self.clear_item(items[index], all_children);
        }
        Ok(())
    }

    /// Clear every root item, and optionally all descendants.
    pub fn clear_all(&mut self, all_children: bool) -> GridResult<()> {
        self.ensure_alive()?;
        for root in self.roots.clone() {
            self.clear_item(root, all_children);
        }
        Ok(())
    }

    /// Set the image of one cell. The first image fixes the grid's image size.
    pub fn set_item_image(&mut self, item: EntityId, column: usize, image: Option<Image>) -> GridResult<()> {
        self.ensure_alive()?;
        let item = self.items.get_mut(&item).ok_or_else(|| missing_entity(&self.retired, item))?;
        let len = item.cells.len();
        let cell = item
            .cell_mut(column)
            .ok_or(GridError::IndexOutOfRange { index: column, len })?;
        if let (None, Some(image)) = (self.item_image_size, &image) {
            self.item_image_size = Some((image.width, image.height));
        }
        cell.image = image;
        Ok(())
    }

    /// Size at which all item images render.
    pub fn item_image_size(&self) -> Option<(i32, i32)> {
        self.item_image_size
    }

    /// Whether any item has an image in the given column.
    pub fn column_has_images(&self, column: usize) -> bool {
        self.items.values().any(|item| item.image(column).is_some())
    }

    // --- Selection and focus ---

    pub fn selection(&self) -> &[EntityId] {
        &self.selection
    }

    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selection.contains(&id)
    }

    pub fn is_selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    /// Disabling selection clears it.
    pub fn set_selection_enabled(&mut self, enabled: bool) -> GridResult<()> {
        self.ensure_alive()?;
        self.selection_enabled = enabled;
        if !enabled {
            self.selection.clear();
        }
        Ok(())
    }

    /// Add the item at a flat index to the selection. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> GridResult<()> {
        self.ensure_alive()?;
        if let Some(id) = self.item_at(index) {
            self.add_to_selection(id);
        }
        Ok(())
    }

    fn add_to_selection(&mut self, id: EntityId) {
        if !self.selection_enabled {
            return;
        }
        if self.style.is_single() {
            self.selection = vec![id];
        } else if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Replace the selection with items at flat indices.
    pub fn set_selection(&mut self, indices: &[usize]) -> GridResult<()> {
        self.ensure_alive()?;
        let items = self.items_pre_order();
        let ids: Vec<EntityId> = indices.iter().filter_map(|&index| items.get(index).copied()).collect();
        self.replace_selection(&ids);
        Ok(())
    }

    /// Replace the selection with the given items. Unknown ids are ignored.
    pub fn set_selection_items(&mut self, ids: &[EntityId]) -> GridResult<()> {
        self.ensure_alive()?;
        let known: Vec<EntityId> = ids.iter().copied().filter(|id| self.items.contains_key(id)).collect();
        self.replace_selection(&known);
        Ok(())
    }

    fn replace_selection(&mut self, ids: &[EntityId]) {
        self.selection.clear();
        if self.style.is_single() && ids.len() > 1 {
            return;
        }
        for &id in ids {
            self.add_to_selection(id);
        }
    }

    pub fn deselect_all(&mut self) -> GridResult<()> {
        self.ensure_alive()?;
        self.selection.clear();
        Ok(())
    }

    pub fn focus_item(&self) -> Option<EntityId> {
        self.focus
    }

    pub fn set_focus_item(&mut self, item: Option<EntityId>) -> GridResult<()> {
        self.ensure_alive()?;
        if let Some(id) = item {
            if !self.items.contains_key(&id) {
                return Err(missing_entity(&self.retired, id));
            }
        }
        self.focus = item;
        Ok(())
    }

    // --- Scrolling ---

    /// Flat index of the item at the top of the viewport.
    pub fn top_index(&self) -> usize {
        self.top_index
    }

    pub fn set_top_index(&mut self, index: usize) -> GridResult<()> {
        self.ensure_alive()?;
        GridError::check_index(index, self.items.len())?;
        self.top_index = index;
        Ok(())
    }

    /// Visible row number of the top item. Hidden items resolve to their
    /// nearest visible ancestor.
    pub fn top_visible_row(&self) -> usize {
        let Some(mut id) = self.item_at(self.top_index) else {
            return 0;
        };
        let rows = self.visible_rows();
        loop {
            if let Some(row) = rows.iter().position(|&row| row == id) {
                return row;
            }
            match self.items.get(&id).and_then(|item| item.parent) {
                Some(parent) => id = parent,
                None => return 0,
            }
        }
    }

    /// Scroll so that a visible row is at the top, clamped to the last row.
    pub fn set_top_visible_row(&mut self, row: usize) -> GridResult<()> {
        self.ensure_alive()?;
        let rows = self.visible_rows();
        let Some(&id) = rows.get(row).or(rows.last()) else {
            return Ok(());
        };
        self.top_index = self.index_of_item(id).unwrap_or(0);
        Ok(())
    }

    pub fn scroll_left(&self) -> i32 {
        self.scroll_left
    }

    pub fn set_scroll_left(&mut self, left: i32) -> GridResult<()> {
        self.ensure_alive()?;
        self.scroll_left = left.max(0);
        Ok(())
    }

    /// Horizontal and vertical scroll bar visibility for the current content.
    pub fn scroll_bars_visible(&self) -> (bool, bool) {
        self.scroll_bars_for(&self.layout())
    }

    pub(crate) fn scroll_bars_for(&self, layout: &ColumnLayout) -> (bool, bool) {
        let horizontal = self.style.contains(GridStyle::H_SCROLL) && layout.total_width() > self.width;
        let content_height = self.visible_rows().len() as i64 * self.item_height as i64;
        let client_height = (self.height - self.header_height() - self.footer_height()) as i64;
        let vertical = self.style.contains(GridStyle::V_SCROLL) && content_height > client_height;
        (horizontal, vertical)
    }

    // --- Cell tool tips ---

    pub fn set_cell_tool_tip(&mut self, item: EntityId, column: usize, text: Option<String>) -> GridResult<()> {
        let item = self.item_mut(item)?;
        let len = item.cells.len();
        item.cell_mut(column)
            .ok_or(GridError::IndexOutOfRange { index: column, len })?
            .tool_tip = text;
        Ok(())
    }

    pub fn cell_tool_tip(&self, item: EntityId, column: usize) -> Option<&str> {
        self.item(item)?.cell(column)?.tool_tip.as_deref()
    }

    /// Whether any cell of any item has a tool tip.
    pub fn has_cell_tool_tips(&self) -> bool {
        self.items.values().any(Item::has_cell_tool_tip)
    }

    /// Ask for the tool tip of a cell to be sent with the next render.
    pub fn request_cell_tool_tip(&mut self, item: EntityId, column: usize) -> GridResult<()> {
        self.ensure_alive()?;
        let cells = self.item(item).ok_or_else(|| missing_entity(&self.retired, item))?.cells.len();
        GridError::check_index(column, cells)?;
        self.tool_tip_request = Some(ToolTipRequest { item, column });
        Ok(())
    }

    pub(crate) fn take_tool_tip_request(&mut self) -> Option<ToolTipRequest> {
        self.tool_tip_request.take()
    }
}
