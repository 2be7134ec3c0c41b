//! Geometry constants used by cell metrics and rendering.

use serde::{Deserialize, Serialize};

use crate::error::GridResult;

/// Theme geometry for a grid. Every field may be omitted when loading from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridTheme {
    /// Horizontal shift per nesting level in the tree column.
    pub indentation_width: i32,
    /// Leading and trailing padding inside non-tree cells.
    pub cell_padding: i32,
    /// Width of the check box region.
    pub check_box_width: i32,
    /// Gap between the check box and the cell image.
    pub check_box_gap: i32,
    pub item_height: i32,
    pub header_height: i32,
    pub footer_height: i32,
    /// Extra header height added when the grid has column groups.
    pub group_header_height: i32,
}

impl Default for GridTheme {
    fn default() -> Self {
        Self {
            indentation_width: 16,
            cell_padding: 6,
            check_box_width: 21,
            check_box_gap: 2,
            item_height: 27,
            header_height: 31,
            footer_height: 31,
            group_header_height: 31,
        }
    }
}

impl GridTheme {
    /// Load a theme from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the theme to JSON.
    pub fn to_json(&self) -> GridResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_theme() {
        let theme = GridTheme::from_json(r#"{"cellPadding": 4, "itemHeight": 20}"#).unwrap();
        assert_eq!(theme.cell_padding, 4);
        assert_eq!(theme.item_height, 20);
        assert_eq!(theme.check_box_width, 21);
        assert_eq!(theme.indentation_width, 16);
    }

    #[test]
    fn test_theme_json_roundtrip() {
        let theme = GridTheme {
            indentation_width: 10,
            ..Default::default()
        };
        let restored = GridTheme::from_json(&theme.to_json().unwrap()).unwrap();
        assert_eq!(restored, theme);
    }

    #[test]
    fn test_invalid_theme() {
        assert!(GridTheme::from_json("42").is_err());
        assert!(GridTheme::from_json(r#"{"cellPadding": "x"}"#).is_err());
        assert!(GridTheme::from_json("{").is_err());
    }
}
