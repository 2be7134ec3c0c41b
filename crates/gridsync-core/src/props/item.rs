use serde_json::{Value, json};

use crate::diff::Property;
use crate::model::{Cell, Item, opt_color, opt_font, opt_image};
use crate::view::GridView;

type P = Property<Item>;

fn cells<F>(item: &Item, f: F) -> Value
where
    F: Fn(&Cell) -> Value,
{
    Value::Array(item.cells().iter().map(f).collect())
}

fn nulls(item: &Item) -> Value {
    Value::Array(vec![Value::Null; item.cells().len()])
}

/// Tree cell metrics of a nested item. Root items use `itemMetrics`.
fn tree_metrics(view: &GridView<'_>, item: &Item) -> Value {
    match item.level() {
        0 => Value::Null,
        level => view.layout().tree_cell_metrics(level).to_value(),
    }
}

pub static ITEM_PROPERTIES: &[P] = &[
    P::create_only("parent", |grid, item| json!(item.parent().unwrap_or(grid.id()))),
    P::create_only("index", |grid, item| json!(grid.sibling_index(item.id()).unwrap_or(0))),
    P::diffed("itemCount", |_, item| json!(item.item_count()), |_, _| json!(0)),
    P::diffed(
        "texts",
        |_, item| cells(item, |cell| json!(cell.text)),
        |_, item| json!(vec![""; item.cells().len()]),
    ),
    P::diffed("images", |_, item| cells(item, |cell| opt_image(cell.image.as_ref())), |_, item| nulls(item)),
    P::diffed("background", |_, item| opt_color(item.background()), |_, _| Value::Null),
    P::diffed("foreground", |_, item| opt_color(item.foreground()), |_, _| Value::Null),
    P::diffed("font", |_, item| opt_font(item.font()), |_, _| Value::Null),
    P::diffed("cellBackgrounds", |_, item| cells(item, |cell| opt_color(cell.background)), |_, item| nulls(item)),
    P::diffed("cellForegrounds", |_, item| cells(item, |cell| opt_color(cell.foreground)), |_, item| nulls(item)),
    P::diffed("cellFonts", |_, item| cells(item, |cell| opt_font(cell.font.as_ref())), |_, item| nulls(item)),
    P::diffed("expanded", |_, item| json!(item.is_expanded()), |_, _| json!(false)),
    P::diffed("checked", |_, item| json!(item.is_checked()), |_, _| json!(false)),
    P::diffed("grayed", |_, item| json!(item.is_grayed()), |_, _| json!(false)),
    P::diffed("treeMetrics", |grid, item| tree_metrics(grid, item), |_, _| Value::Null),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{capture, change_operations, create_operations};
    use crate::ids::EntityKind;
    use crate::model::{Color, ColumnStyle, Grid, GridStyle};
    use crate::protocol::Operation;

    #[test]
    fn test_fresh_item_payload() {
        let mut grid = Grid::new("w0", GridStyle::empty());
        grid.create_column(ColumnStyle::empty(), None).unwrap();
        grid.create_column(ColumnStyle::empty(), None).unwrap();
        let root = grid.create_item(None, None).unwrap();
        let child = grid.create_item(Some(root), None).unwrap();
        let item = grid.item(child).unwrap();
        let view = grid.view();
        let live = capture(ITEM_PROPERTIES, &view, item);
        assert_eq!(live.get("texts"), Some(&json!(["", ""])));
        let ops = create_operations(ITEM_PROPERTIES, &view, item, child, EntityKind::Item, &live);
        let Some(Operation::Create { properties, .. }) = ops.first() else {
            panic!("expected create");
        };
        assert_eq!(properties.get("parent"), Some(&json!(root.to_string())));
        assert_eq!(properties.get("index"), Some(&json!(0)));
        // The nested item's tree cell is indented one level.
        assert_eq!(properties.get("treeMetrics"), Some(&json!([0, 0, 0, 16, 0, 16, 0, 0, 0])));
        assert_eq!(properties.len(), 3);
    }

    #[test]
    fn test_root_item_parent_is_grid() {
        let mut grid = Grid::new("w0", GridStyle::empty());
        grid.create_item(None, None).unwrap();
        let second = grid.create_item(None, Some(0)).unwrap();
        let item = grid.item(second).unwrap();
        assert_eq!(read_create_only(&grid, item, "parent"), json!("w1"));
        assert_eq!(read_create_only(&grid, item, "index"), json!(0));
    }

    fn read_create_only(grid: &Grid, item: &Item, key: &str) -> Value {
        crate::diff::read(ITEM_PROPERTIES, key, &grid.view(), item).map(|(_, v)| v).unwrap()
    }

    #[test]
    fn test_cell_changes_emit_whole_arrays() {
        let mut grid = Grid::new("w0", GridStyle::empty());
        grid.create_column(ColumnStyle::empty(), None).unwrap();
        grid.create_column(ColumnStyle::empty(), None).unwrap();
        let id = grid.create_item(None, None).unwrap();
        let before = capture(ITEM_PROPERTIES, &grid.view(), grid.item(id).unwrap());
        {
            let item = grid.item_mut(id).unwrap();
            item.set_text(1, "b").unwrap();
            item.cell_mut(0).unwrap().background = Some(Color::rgb(255, 0, 0));
        }
        let after = capture(ITEM_PROPERTIES, &grid.view(), grid.item(id).unwrap());
        let ops = change_operations(ITEM_PROPERTIES, id, &before, &after);
        assert_eq!(
            ops,
            vec![
                Operation::Set {
                    id,
                    property: "texts".into(),
                    value: json!(["", "b"])
                },
                Operation::Set {
                    id,
                    property: "cellBackgrounds".into(),
                    value: json!([[255, 0, 0, 255], null])
                },
            ]
        );
    }

    #[test]
    fn test_tree_metrics_follow_depth() {
        let mut grid = Grid::new("w0", GridStyle::CHECK);
        let column = grid.create_column(ColumnStyle::empty(), None).unwrap();
        grid.column_mut(column).unwrap().set_width(120).unwrap();
        let root = grid.create_item(None, None).unwrap();
        let child = grid.create_item(Some(root), None).unwrap();
        let leaf = grid.create_item(Some(child), None).unwrap();
        let view = grid.view();
        let metrics = |id| {
            let live = capture(ITEM_PROPERTIES, &view, grid.item(id).unwrap());
            live.get("treeMetrics").cloned()
        };
        assert_eq!(metrics(root), Some(Value::Null));
        assert_eq!(metrics(child), Some(json!([0, 0, 120, 39, 0, 39, 75, 16, 21])));
        assert_eq!(metrics(leaf), Some(json!([0, 0, 120, 55, 0, 55, 59, 32, 21])));
    }
}
