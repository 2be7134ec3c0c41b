use serde_json::{Value, json};

use crate::diff::Property;
use crate::model::{Column, Grid, Listeners, opt_font, opt_image};

use super::opt_id;

type P = Property<Column>;

fn index(grid: &Grid, column: &Column) -> usize {
    grid.index_of_column(column.id()).unwrap_or(0)
}

pub static COLUMN_PROPERTIES: &[P] = &[
    P::create_only("parent", |grid, _| json!(grid.id())),
    P::create_only("group", |_, column| opt_id(column.group())),
    P::diffed("index", |grid, column| json!(index(grid, column)), |_, _| json!(0)),
    P::diffed("left", |grid, column| json!(grid.column_left(index(grid, column))), |_, _| json!(0)),
    P::diffed("width", |_, column| json!(column.width()), |_, _| json!(0)),
    P::diffed("alignment", |_, column| json!(column.alignment().as_str()), |_, _| json!("left")),
    P::diffed("resizable", |_, column| json!(column.is_resizable()), |_, _| json!(true)),
    P::diffed("moveable", |_, column| json!(column.is_moveable()), |_, _| json!(false)),
    P::diffed("visibility", |grid, column| json!(grid.is_column_shown(index(grid, column))), |_, _| json!(true)),
    P::diffed("check", |_, column| json!(column.is_check()), |_, _| json!(false)),
    P::diffed("text", |_, column| json!(column.text()), |_, _| json!("")),
    P::diffed("image", |_, column| opt_image(column.image()), |_, _| Value::Null),
    P::diffed("toolTip", |_, column| json!(column.tool_tip()), |_, _| Value::Null),
    P::diffed("font", |_, column| opt_font(column.font()), |_, _| Value::Null),
    P::diffed("footerText", |_, column| json!(column.footer_text()), |_, _| json!("")),
    P::diffed("footerImage", |_, column| opt_image(column.footer_image()), |_, _| Value::Null),
    P::diffed("footerFont", |_, column| opt_font(column.footer_font()), |_, _| Value::Null),
    P::listener("Selection", |_, column| json!(column.listeners().contains(Listeners::SELECTION))),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{capture, create_operations};
    use crate::ids::EntityKind;
    use crate::model::{ColumnStyle, Font, GridStyle, GroupStyle};
    use crate::protocol::Operation;

    fn payload(grid: &Grid, column: &Column) -> serde_json::Map<String, Value> {
        let view = grid.view();
        let live = capture(COLUMN_PROPERTIES, &view, column);
        let ops = create_operations(COLUMN_PROPERTIES, &view, column, column.id(), EntityKind::Column, &live);
        match ops.into_iter().next() {
            Some(Operation::Create { properties, .. }) => properties,
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_fresh_column_payload_is_minimal() {
        let mut grid = Grid::new("w0", GridStyle::empty());
        let id = grid.create_column(ColumnStyle::empty(), None).unwrap();
        let props = payload(&grid, grid.column(id).unwrap());
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("parent"), Some(&json!("w1")));
        assert!(props.get("width").is_none());
        assert!(props.get("alignment").is_none());
        assert!(props.get("group").is_none());
    }

    #[test]
    fn test_column_payload_with_values() {
        let mut grid = Grid::new("w0", GridStyle::empty());
        let group = grid.create_column_group(GroupStyle::empty()).unwrap();
        grid.create_column(ColumnStyle::empty(), None).unwrap();
        let id = grid.create_grouped_column(group, ColumnStyle::CENTER | ColumnStyle::CHECK).unwrap();
        {
            let column = grid.column_mut(id).unwrap();
            column.set_width(40).unwrap();
            column.set_font(Some(Font::new("Arial", 20).bold()));
            column.set_moveable(true);
        }
        let first = grid.columns()[0].id();
        grid.column_mut(first).unwrap().set_width(15).unwrap();
        let props = payload(&grid, grid.column(id).unwrap());
        assert_eq!(props.get("group"), Some(&json!(group.to_string())));
        assert_eq!(props.get("index"), Some(&json!(1)));
        assert_eq!(props.get("left"), Some(&json!(15)));
        assert_eq!(props.get("width"), Some(&json!(40)));
        assert_eq!(props.get("alignment"), Some(&json!("center")));
        assert_eq!(props.get("check"), Some(&json!(true)));
        assert_eq!(props.get("moveable"), Some(&json!(true)));
        assert_eq!(props.get("font"), Some(&json!([["Arial"], 20, true, false])));
    }

    #[test]
    fn test_hidden_column_visibility() {
        let mut grid = Grid::new("w0", GridStyle::empty());
        let id = grid.create_column(ColumnStyle::empty(), None).unwrap();
        grid.column_mut(id).unwrap().set_visible(false);
        let props = payload(&grid, grid.column(id).unwrap());
        assert_eq!(props.get("visibility"), Some(&json!(false)));
    }
}
