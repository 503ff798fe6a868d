use clap::Parser;
use tracing_subscriber::EnvFilter;

use ovon_basic_agent::config::Config;
use ovon_basic_agent::daemon;
use ovon_basic_agent::error::Result;

#[derive(Parser, Debug)]
#[command(name = "ovon-basic-agent")]
#[command(about = "Minimal OVON interchange protocol agent")]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 8082, env = "OVON_AGENT_PORT")]
    port: u16,

    #[arg(long, help = "Path to a JSON config file")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ovon_basic_agent=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    daemon::run(&cli.host, cli.port, config).await
}
