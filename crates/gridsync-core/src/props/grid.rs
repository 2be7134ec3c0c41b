use serde_json::{Value, json};

use crate::diff::Property;
use crate::metrics::CellMetrics;
use crate::model::{Column, Grid, GridStyle, Listeners};
use crate::view::GridView;

use super::opt_id;

type P = Property<Grid>;

/// Transient property carrying the text of a requested cell tool tip.
pub const CELL_TOOL_TIP_TEXT: &str = "cellToolTipText";

fn item_metrics(view: &GridView<'_>) -> Value {
    Value::Array(view.layout().cell_metrics().iter().map(CellMetrics::to_value).collect())
}

fn check_box_metrics(grid: &Grid) -> Value {
    if grid.style().contains(GridStyle::CHECK) {
        json!([0, grid.theme().check_box_width])
    } else {
        Value::Null
    }
}

pub static GRID_PROPERTIES: &[P] = &[
    P::create_only("parent", |grid, _| json!(grid.parent())),
    P::create_only("style", |grid, _| json!(grid.style().names())),
    P::create_only("appearance", |_, _| json!("tree")),
    P::create_only("indentionWidth", |grid, _| json!(grid.theme().indentation_width)),
    P::create_only("checkBoxMetrics", |grid, _| check_box_metrics(grid)),
    P::diffed("itemCount", |grid, _| json!(grid.root_item_count()), |_, _| json!(0)),
    P::diffed("itemHeight", |grid, _| json!(grid.item_height()), |_, _| json!(0)),
    P::diffed("itemMetrics", |grid, _| item_metrics(grid), |_, _| json!([])),
    P::diffed("columnCount", |grid, _| json!(grid.column_count()), |_, _| json!(0)),
    P::diffed("treeColumn", |grid, _| json!(grid.tree_column()), |_, _| json!(0)),
    P::diffed("headerHeight", |grid, _| json!(grid.header_height()), |_, _| json!(0)),
    P::diffed("headerVisible", |grid, _| json!(grid.is_header_visible()), |_, _| json!(false)),
    P::diffed("footerHeight", |grid, _| json!(grid.footer_height()), |_, _| json!(0)),
    P::diffed("footerVisible", |grid, _| json!(grid.is_footer_visible()), |_, _| json!(false)),
    P::diffed("linesVisible", |grid, _| json!(grid.is_lines_visible()), |_, _| json!(false)),
    P::diffed("topItemIndex", |grid, _| json!(grid.top_visible_row()), |_, _| json!(0)),
    P::diffed("focusItem", |grid, _| opt_id(grid.focus_item()), |_, _| Value::Null),
    P::diffed("scrollLeft", |grid, _| json!(grid.scroll_left()), |_, _| json!(0)),
    P::diffed("selection", |grid, _| json!(grid.selection()), |_, _| json!([])),
    P::diffed("sortDirection", |grid, _| json!(grid.sort_direction().as_str()), |_, _| json!("none")),
    P::diffed("sortColumn", |grid, _| opt_id(grid.sort_column().map(Column::id)), |_, _| Value::Null),
    P::diffed("scrollBarsVisible", |grid, _| json!(grid.scroll_bars_visible()), |_, _| json!([false, false])),
    P::diffed("enableCellToolTip", |grid, _| json!(grid.has_cell_tool_tips()), |_, _| json!(false)),
    P::listener("Selection", |grid, _| {
        json!(grid.listeners().intersects(Listeners::SELECTION | Listeners::DEFAULT_SELECTION))
    }),
    P::listener("Expand", |grid, _| json!(grid.listeners().intersects(Listeners::EXPAND | Listeners::COLLAPSE))),
    P::listener("scrollBarsSelection", |grid, _| json!(grid.has_scroll_bar_listener())),
];
