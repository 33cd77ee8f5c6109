use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use amtrak_feed::summary::{
    find_train, route_detail, route_statuses, station_names, trains_by_route,
};
use amtrak_feed::{Dataset, FeedClient, FeedConfig};

#[derive(Parser, Debug)]
#[command(
    name = "amtrak-feed",
    version,
    about = "Decrypt and summarise the Amtrak live train map feed"
)]
struct Cli {
    /// Timeout for each upstream request, in seconds
    #[arg(long, env = "AMTRAK_FEED_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Fetch every endpoint from this host instead of maps.amtrak.com
    #[arg(long, env = "AMTRAK_FEED_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the resolved session parameters (key material omitted)
    Params,
    /// List train numbers grouped by route
    Trains,
    /// Show active/pending/completed counts per route
    Routes,
    /// Show status counts and train numbers for one route
    Route {
        /// Route name as listed by `routes`, e.g. "Northeast Regional"
        name: String,
    },
    /// Show everything the feed reports for one train
    Train {
        /// Train number, e.g. 171
        number: u32,
    },
    /// List station names
    Stations,
    /// Print the decrypted GeoJSON document
    Raw {
        #[arg(value_enum)]
        dataset: DatasetArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DatasetArg {
    Trains,
    Stations,
}

impl From<DatasetArg> for Dataset {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Trains => Dataset::Trains,
            DatasetArg::Stations => Dataset::Stations,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = FeedConfig::new().with_timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    let client = FeedClient::new(config)?;

    match cli.command {
        Command::Params => {
            let params = client.resolve_parameters().await?;
            println!("public key: {} characters", params.public_key.chars().count());
            println!("salt:       {}", params.salt);
            println!("iv:         {}", params.iv);
        }
        Command::Trains => {
            let trains = client.trains().await?;
            for (route, numbers) in trains_by_route(&trains)? {
                let numbers: Vec<String> = numbers.iter().map(u32::to_string).collect();
                println!("{route}: {}", numbers.join(", "));
            }
        }
        Command::Routes => {
            let trains = client.trains().await?;
            println!("{:<45} {:>7} {:>7} {:>9}", "Route", "Active", "Pending", "Completed");
            for (route, status) in route_statuses(&trains)? {
                println!(
                    "{:<45} {:>7} {:>7} {:>9}",
                    route, status.active, status.pending, status.completed
                );
            }
        }
        Command::Route { name } => {
            let trains = client.trains().await?;
            let detail = route_detail(&trains, &name)?;
            println!("{}", detail.name);
            println!("  active:    {}", detail.status.active);
            println!("  pending:   {}", detail.status.pending);
            println!("  completed: {}", detail.status.completed);
            let numbers: Vec<String> = detail.trains.iter().map(u32::to_string).collect();
            println!("  trains:    {}", numbers.join(", "));
        }
        Command::Train { number } => {
            let trains = client.trains().await?;
            match find_train(&trains, number) {
                Some(train) => println!("{}", serde_json::to_string_pretty(train)?),
                None => println!("Train {number} not found"),
            }
        }
        Command::Stations => {
            let stations = client.stations().await?;
            for name in station_names(&stations)? {
                println!("{name}");
            }
        }
        Command::Raw { dataset } => {
            let document = client.fetch_document(dataset.into()).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
