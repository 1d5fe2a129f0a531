use std::fmt::Write as _;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{format_money, InventoryClient, InventorySnapshot, ItemForm};
use shared::{
    domain::{ItemId, ItemPatch},
    protocol::MergeAction,
    view::{line_total, SortKey},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Terminal front end for the inventory API")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the inventory table and KPIs.
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// id, name, quantity or price; anything else keeps server order.
        #[arg(long, default_value = "id")]
        sort: String,
    },
    /// Create an item, or add to its quantity when the id exists.
    Add(FormArgs),
    Update(FormArgs),
    Delete {
        id: i64,
    },
    /// Print an item as it would be loaded into the form.
    Show {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct FormArgs {
    #[arg(long, default_value = "")]
    id: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    quantity: String,
    #[arg(long, default_value = "")]
    price: String,
    #[arg(long, default_value = "")]
    category: String,
}

impl From<FormArgs> for ItemForm {
    fn from(args: FormArgs) -> Self {
        Self {
            id: args.id,
            name: args.name,
            quantity: args.quantity,
            price: args.price,
            category: args.category,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();
    let client = InventoryClient::new(&cli.server_url)?;
    debug!(server_url = %client.base_url(), "using inventory server");

    match cli.command {
        Command::List { search, sort } => {
            let key: SortKey = sort.parse()?;
            let snapshot = client.snapshot(&search, key).await?;
            print!("{}", render(&snapshot));
        }
        Command::Add(args) => {
            let Ok(item) = ItemForm::from(args).parse() else {
                bail!("Incomplete data");
            };
            let response = client.create_or_merge(&item).await?;
            println!("{}", merge_message(response.action));
            print_all(&client).await?;
        }
        Command::Update(args) => {
            let Ok(item) = ItemForm::from(args).parse() else {
                bail!("Incomplete data");
            };
            client.update_item(item.id, &ItemPatch::from(&item)).await?;
            println!("Updated");
            print_all(&client).await?;
        }
        Command::Delete { id } => {
            client.delete_item(ItemId(id)).await?;
            println!("Deleted");
            print_all(&client).await?;
        }
        Command::Show { id } => {
            let Some(item) = client.find_item(ItemId(id)).await? else {
                bail!("ID does not exist");
            };
            print!("{}", render_form(&ItemForm::from_item(&item)));
        }
    }

    Ok(())
}

async fn print_all(client: &InventoryClient) -> Result<()> {
    let snapshot = client.snapshot("", SortKey::Unsorted).await?;
    print!("{}", render(&snapshot));
    Ok(())
}

fn merge_message(action: MergeAction) -> &'static str {
    match action {
        MergeAction::Created => "Created",
        MergeAction::Merged => "Quantity added",
    }
}

fn render(snapshot: &InventorySnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<24} {:>10} {:>10}  {:<16} {:>12}",
        "ID", "Name", "Quantity", "Price", "Category", "Total"
    );
    for item in &snapshot.rows {
        let price = item
            .price
            .map(|price| format_money(Some(price)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:>10} {:>10}  {:<16} {:>12}",
            item.id.0,
            item.name,
            item.quantity,
            price,
            item.category.as_deref().unwrap_or_default(),
            format_money(Some(line_total(item)))
        );
    }
    let _ = writeln!(
        out,
        "\nItems: {}  Units: {}  Value: {}",
        snapshot.kpis.count,
        snapshot.kpis.total_quantity,
        format_money(Some(snapshot.kpis.total_value))
    );
    out
}

fn render_form(form: &ItemForm) -> String {
    format!(
        "id: {}\nname: {}\nquantity: {}\nprice: {}\ncategory: {}\n",
        form.id, form.name, form.quantity, form.price, form.category
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
