//! Style flags and small enums shared by grid entities.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Creation-time style of a grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GridStyle: u16 {
        const SINGLE = 1 << 0;
        const MULTI = 1 << 1;
        const CHECK = 1 << 2;
        const FULL_SELECTION = 1 << 3;
        const VIRTUAL = 1 << 4;
        const NO_FOCUS = 1 << 5;
        const BORDER = 1 << 6;
        const H_SCROLL = 1 << 7;
        const V_SCROLL = 1 << 8;
    }
}

bitflags! {
    /// Creation-time style of a column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ColumnStyle: u8 {
        const LEFT = 1 << 0;
        const CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const CHECK = 1 << 3;
    }
}

bitflags! {
    /// Creation-time style of a column group.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GroupStyle: u8 {
        /// The group header shows an expand/collapse toggle.
        const TOGGLE = 1 << 0;
    }
}

bitflags! {
    /// Event kinds the server side is interested in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Listeners: u8 {
        const SELECTION = 1 << 0;
        const DEFAULT_SELECTION = 1 << 1;
        const EXPAND = 1 << 2;
        const COLLAPSE = 1 << 3;
    }
}

impl GridStyle {
    /// Style names as rendered in the creation payload.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Whether the grid keeps at most one selected item.
    pub fn is_single(self) -> bool {
        !self.contains(GridStyle::MULTI)
    }
}

/// Horizontal alignment of column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn from_style(style: ColumnStyle) -> Self {
        if style.contains(ColumnStyle::CENTER) {
            Alignment::Center
        } else if style.contains(ColumnStyle::RIGHT) {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Sort indicator shown in a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Up,
    Down,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::None => "none",
            SortDirection::Up => "up",
            SortDirection::Down => "down",
        }
    }
}
