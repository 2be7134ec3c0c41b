use serde_json::{Value, json};

use crate::diff::Property;
use crate::model::{ColumnGroup, Grid, Listeners, opt_font, opt_image};

type P = Property<ColumnGroup>;

fn any_member_shown(grid: &Grid, group: &ColumnGroup) -> bool {
    grid.group_members(group.id())
        .into_iter()
        .any(|index| grid.is_column_shown(index))
}

pub static GROUP_PROPERTIES: &[P] = &[
    P::create_only("parent", |grid, _| json!(grid.id())),
    P::diffed("left", |grid, group| json!(grid.group_bounds(group.id()).0), |_, _| json!(0)),
    P::diffed("width", |grid, group| json!(grid.group_bounds(group.id()).1), |_, _| json!(0)),
    P::diffed("text", |_, group| json!(group.text()), |_, _| json!("")),
    P::diffed("image", |_, group| opt_image(group.image()), |_, _| Value::Null),
    P::diffed("font", |_, group| opt_font(group.font()), |_, _| Value::Null),
    P::diffed("expanded", |_, group| json!(group.is_expanded()), |_, _| json!(true)),
    P::diffed("visibility", |grid, group| json!(any_member_shown(grid, group)), |_, _| json!(true)),
    P::listener("Expand", |_, group| {
        json!(group.listeners().intersects(Listeners::EXPAND | Listeners::COLLAPSE))
    }),
];
