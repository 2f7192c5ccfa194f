use std::error::Error;

use pocketshelf_core::{
    ApiConfig, NameFilter, PocketShelf, ReqwestTransport, Resource, ResourceClient,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "pocketshelf", about = "Browse and add PocketShelf items and forms")]
struct Opts {
    /// API base URL; defaults to $POCKETSHELF_API_URL, then the local server
    #[structopt(long)]
    api_url: Option<String>,
    #[structopt(subcommand)]
    resource: ResourceCmd,
}

#[derive(StructOpt, Debug, PartialEq)]
enum ResourceCmd {
    /// Inventory items
    Items {
        #[structopt(subcommand)]
        action: Action,
    },
    /// Donor, client and volunteer intake forms
    Forms {
        #[structopt(subcommand)]
        action: Action,
    },
}

#[derive(StructOpt, Debug, PartialEq)]
enum Action {
    /// Print matching records as JSON
    List {
        #[structopt(long)]
        name: Option<String>,
    },
    /// Create a record from a JSON object and print its new id
    Add { json: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let opts = Opts::from_args();
    let config = match opts.api_url.as_deref() {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    log::debug!("using PocketShelf API at {}", config.base_url());

    let shelf = PocketShelf::new(&config, ReqwestTransport::new());
    match opts.resource {
        ResourceCmd::Items { action } => run(&shelf.items, action).await,
        ResourceCmd::Forms { action } => run(&shelf.forms, action).await,
    }
}

async fn run<R>(
    client: &ResourceClient<R, ReqwestTransport>,
    action: Action,
) -> Result<(), Box<dyn Error>>
where
    R: Resource,
    R::Record: Serialize,
    R::Draft: DeserializeOwned,
{
    match action {
        Action::List { name } => {
            let records = client.list(&NameFilter { name }).await?;
            let records = client.filter_local(records);
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Action::Add { json } => {
            let draft: R::Draft = serde_json::from_str(&json)?;
            let id = client.create(&draft).await?;
            println!("{id}");
        }
    }
    Ok(())
}
