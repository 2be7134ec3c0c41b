//! The grid every new connection starts with.

use gridsync_core::{
    Alignment, Color, ColumnStyle, EntityId, Font, Grid, GridResult, GridStyle, GridTheme, GroupStyle, Listeners,
};

const FILES: &[(&str, &str, &str, &str, &[&str])] = &[
    ("src", "", "2026-09-30", "alice", &["lib.rs", "main.rs"]),
    ("docs", "", "2026-08-12", "bob", &["guide.md"]),
    ("Cargo.toml", "1 KB", "2026-10-01", "alice", &[]),
    ("README.md", "4 KB", "2026-07-21", "carol", &[]),
];

/// Background of the first root row.
const HIGHLIGHT: &str = "#f0f4ff";

/// A small file-browser style tree: three plain columns followed by a
/// collapsible "Details" group, with a few expandable folders.
pub fn demo_grid(theme: GridTheme) -> GridResult<Grid> {
    let style = GridStyle::MULTI | GridStyle::CHECK | GridStyle::FULL_SELECTION | GridStyle::V_SCROLL;
    let mut grid = Grid::with_theme("w0", style, theme);
    grid.set_size(640, 400)?;
    grid.set_header_visible(true)?;
    grid.set_lines_visible(true)?;
    grid.set_listener(Listeners::SELECTION | Listeners::EXPAND, true)?;

    for (text, width, alignment) in [
        ("Name", 220, Alignment::Left),
        ("Size", 80, Alignment::Right),
        ("Modified", 120, Alignment::Center),
    ] {
        let id = grid.create_column(ColumnStyle::empty(), None)?;
        let column = grid.column_mut(id)?;
        column.set_text(text);
        column.set_width(width)?;
        column.set_alignment(alignment);
        column.set_moveable(true);
    }

    let group = grid.create_column_group(GroupStyle::TOGGLE)?;
    grid.column_group_mut(group)?.set_text("Details");
    for (text, summary) in [("Owner", true), ("Permissions", false)] {
        let id = grid.create_grouped_column(group, ColumnStyle::empty())?;
        let column = grid.column_mut(id)?;
        column.set_text(text);
        column.set_width(100)?;
        column.set_summary(summary);
        column.set_moveable(true);
    }

    let bold = Font::new("sans-serif", 12).bold();
    for (name, size, modified, owner, children) in FILES {
        let item = grid.create_item(None, None)?;
        write_row(&mut grid, item, &[*name, *size, *modified, *owner, "rwxr-xr-x"])?;
        if !children.is_empty() {
            grid.item_mut(item)?.set_font(Some(bold.clone()));
        }
        for child in *children {
            let id = grid.create_item(Some(item), None)?;
            write_row(&mut grid, id, &[*child, "2 KB", *modified, *owner, "rw-r--r--"])?;
        }
    }
    if let Some(&first) = grid.root_items().first() {
        grid.item_mut(first)?.set_background(Some(Color::parse(HIGHLIGHT)?));
    }
    Ok(grid)
}

fn write_row(grid: &mut Grid, item: EntityId, texts: &[&str]) -> GridResult<()> {
    let item = grid.item_mut(item)?;
    for (column, text) in texts.iter().enumerate() {
        item.set_text(column, *text)?;
    }
    Ok(())
}
