//! Columns and column groups.
//!
//! Group membership is a flat relation: each column carries an optional group
//! id, and a group's members are the columns naming it, in index order.

use crate::error::{GridError, GridResult};
use crate::ids::EntityId;

use super::style::{Alignment, ColumnStyle, GroupStyle, Listeners, SortDirection};
use super::values::{Font, Image};

/// Largest accepted column width in pixels.
pub const MAX_COLUMN_WIDTH: i32 = 1 << 20;

/// A grid column.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) id: EntityId,
    pub(crate) style: ColumnStyle,
    pub(crate) group: Option<EntityId>,
    pub(crate) width: i32,
    pub(crate) alignment: Alignment,
    pub(crate) resizable: bool,
    pub(crate) moveable: bool,
    pub(crate) visible: bool,
    /// Shown while the owning group is expanded.
    pub(crate) detail: bool,
    /// Shown while the owning group is collapsed.
    pub(crate) summary: bool,
    pub(crate) text: String,
    pub(crate) image: Option<Image>,
    pub(crate) tool_tip: Option<String>,
    pub(crate) font: Option<Font>,
    pub(crate) footer_text: String,
    pub(crate) footer_image: Option<Image>,
    pub(crate) footer_font: Option<Font>,
    pub(crate) sort: SortDirection,
    pub(crate) listeners: Listeners,
}

impl Column {
    pub(crate) fn new(id: EntityId, style: ColumnStyle, group: Option<EntityId>) -> Self {
        Self {
            id,
            style,
            group,
            width: 0,
            alignment: Alignment::from_style(style),
            resizable: true,
            moveable: false,
            visible: true,
            detail: true,
            summary: true,
            text: String::new(),
            image: None,
            tool_tip: None,
            font: None,
            footer_text: String::new(),
            footer_image: None,
            footer_font: None,
            sort: SortDirection::None,
            listeners: Listeners::empty(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn group(&self) -> Option<EntityId> {
        self.group
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Set the column width. Widths outside `0..=MAX_COLUMN_WIDTH` are rejected.
    pub fn set_width(&mut self, width: i32) -> GridResult<()> {
        if width < 0 {
            return Err(GridError::InvalidArgument(format!("negative column width {width}")));
        }
        if width > MAX_COLUMN_WIDTH {
            return Err(GridError::InvalidArgument(format!(
                "column width {width} exceeds {MAX_COLUMN_WIDTH}"
            )));
        }
        self.width = width;
        Ok(())
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    /// Whether cells of this column carry a check box.
    pub fn is_check(&self) -> bool {
        self.style.contains(ColumnStyle::CHECK)
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    pub fn is_moveable(&self) -> bool {
        self.moveable
    }

    pub fn set_moveable(&mut self, moveable: bool) {
        self.moveable = moveable;
    }

    /// The column's own visibility flag, ignoring group state.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_detail(&self) -> bool {
        self.detail
    }

    pub fn set_detail(&mut self, detail: bool) {
        self.detail = detail;
    }

    pub fn is_summary(&self) -> bool {
        self.summary
    }

    pub fn set_summary(&mut self, summary: bool) {
        self.summary = summary;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
    }

    pub fn tool_tip(&self) -> Option<&str> {
        self.tool_tip.as_deref()
    }

    pub fn set_tool_tip(&mut self, tool_tip: Option<String>) {
        self.tool_tip = tool_tip;
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font;
    }

    pub fn footer_text(&self) -> &str {
        &self.footer_text
    }

    pub fn set_footer_text(&mut self, text: impl Into<String>) {
        self.footer_text = text.into();
    }

    pub fn footer_image(&self) -> Option<&Image> {
        self.footer_image.as_ref()
    }

    pub fn set_footer_image(&mut self, image: Option<Image>) {
        self.footer_image = image;
    }

    pub fn footer_font(&self) -> Option<&Font> {
        self.footer_font.as_ref()
    }

    pub fn set_footer_font(&mut self, font: Option<Font>) {
        self.footer_font = font;
    }

    pub fn sort(&self) -> SortDirection {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortDirection) {
        self.sort = sort;
    }

    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    pub fn set_listener(&mut self, kind: Listeners, enabled: bool) {
        self.listeners.set(kind, enabled);
    }
}

/// A named block of contiguous columns with an expanded/collapsed state.
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    pub(crate) id: EntityId,
    pub(crate) style: GroupStyle,
    pub(crate) text: String,
    pub(crate) image: Option<Image>,
    pub(crate) font: Option<Font>,
    pub(crate) expanded: bool,
    pub(crate) listeners: Listeners,
}

impl ColumnGroup {
    pub(crate) fn new(id: EntityId, style: GroupStyle) -> Self {
        Self {
            id,
            style,
            text: String::new(),
            image: None,
            font: None,
            expanded: true,
            listeners: Listeners::empty(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn style(&self) -> GroupStyle {
        self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    pub fn set_listener(&mut self, kind: Listeners, enabled: bool) {
        self.listeners.set(kind, enabled);
    }

    /// Whether a member column is shown under the current expanded state.
    pub(crate) fn shows(&self, column: &Column) -> bool {
        if self.expanded { column.detail } else { column.summary }
    }
}
