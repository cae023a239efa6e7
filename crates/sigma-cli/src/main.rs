mod check;
mod runtime;

use clap::{Parser, Subcommand};
use sigma_core::FeedRequest;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sigma")]
#[command(about = "Sigma news engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a synthesized feed and print it as JSON
    Feed {
        /// Free-text search; switches the run to search mode
        #[arg(long, short)]
        query: Option<String>,

        /// News category (e.g. technology, sports, india, politics, all)
        #[arg(long, short)]
        category: Option<String>,

        /// 1-based result page
        #[arg(long, short)]
        page: Option<u32>,
    },
    /// Run a single-page topic analysis and print it as JSON
    Analyze {
        /// Topic to search for; defaults to "Global Intelligence"
        topic: Option<String>,
    },
    /// Check credentials and run each stage once against live providers
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = sigma_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Feed {
            query,
            category,
            page,
        } => {
            let request = FeedRequest::from_params(query.as_deref(), category.as_deref(), page);
            runtime::run_and_print(&config, &request).await?;
        }
        Commands::Analyze { topic } => {
            let request = FeedRequest::analysis(topic.as_deref());
            runtime::run_and_print(&config, &request).await?;
        }
        Commands::Check => check::run_check(&config).await?,
    }

    Ok(())
}
