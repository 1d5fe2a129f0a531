use super::*;
use shared::{
    domain::Item,
    view::{aggregate, Kpis},
};

#[test]
fn renders_rows_and_kpis() {
    let items = vec![
        Item::new(ItemId(1), "bolt", 10.0).with_price(0.5),
        Item::new(ItemId(2), "nut", 4.0).with_category("hardware"),
    ];
    let snapshot = InventorySnapshot {
        rows: items.clone(),
        kpis: aggregate(&items),
    };

    let text = render(&snapshot);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[1].contains("bolt"));
    assert!(lines[1].contains("$0.50"));
    assert!(lines[1].contains("$5.00"));
    assert!(lines[2].contains("hardware"));
    assert!(lines[2].contains("$0.00"));
    assert!(text.ends_with("Items: 2  Units: 14  Value: $5.00\n"));
}

#[test]
fn empty_inventory_still_shows_kpis() {
    let snapshot = InventorySnapshot {
        rows: Vec::new(),
        kpis: Kpis::default(),
    };
    assert!(render(&snapshot).contains("Items: 0  Units: 0  Value: $0.00"));
}

#[test]
fn merge_actions_have_user_messages() {
    assert_eq!(merge_message(MergeAction::Created), "Created");
    assert_eq!(merge_message(MergeAction::Merged), "Quantity added");
}

#[test]
fn show_renders_form_fields() {
    let form = ItemForm::from_item(&Item::new(ItemId(3), "gear", 2.0).with_price(1.25));
    assert_eq!(
        render_form(&form),
        "id: 3\nname: gear\nquantity: 2\nprice: 1.25\ncategory: \n"
    );
}

#[test]
fn cli_parses_add_with_form_fields() {
    let cli = Cli::try_parse_from([
        "inventory",
        "add",
        "--id",
        "4",
        "--name",
        "bolt",
        "--quantity",
        "3",
    ])
    .expect("cli");
    let Command::Add(args) = cli.command else {
        panic!("expected add");
    };
    let item = ItemForm::from(args).parse().expect("item");
    assert_eq!(item, Item::new(ItemId(4), "bolt", 3.0));
}
