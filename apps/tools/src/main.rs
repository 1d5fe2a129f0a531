use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::{
    domain::{Item, ItemId, ItemPatch},
    view::{self, SortKey},
};
use storage::ItemStore;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "data/inventario.json")]
    data_file: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "id")]
        sort: String,
    },
    Add {
        id: i64,
        name: String,
        quantity: f64,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        id: i64,
    },
    Kpis,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let cli = Cli::parse();
    let store = ItemStore::open_file(&cli.data_file);

    match cli.command {
        Command::List { search, sort } => {
            let key: SortKey = sort.parse()?;
            let items = view::project(&store.load().await, &search, key);
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Add {
            id,
            name,
            quantity,
            price,
            category,
        } => {
            let candidate = Item {
                id: ItemId(id),
                name,
                quantity,
                price,
                category,
            };
            let (action, item) = store.create_or_merge(candidate).await?;
            println!("{action:?} id={} quantity={}", item.id, item.quantity);
        }
        Command::Update {
            id,
            name,
            quantity,
            price,
            category,
        } => {
            let patch = ItemPatch {
                name,
                quantity,
                price,
                category,
            };
            let item = store.replace(ItemId(id), patch).await?;
            println!("updated {}", serde_json::to_string(&item)?);
        }
        Command::Delete { id } => {
            let item = store.remove(ItemId(id)).await?;
            println!("removed {}", serde_json::to_string(&item)?);
        }
        Command::Kpis => {
            let kpis = view::aggregate(&store.load().await);
            println!(
                "items={} units={} value={:.2}",
                kpis.count, kpis.total_quantity, kpis.total_value
            );
        }
    }

    Ok(())
}
