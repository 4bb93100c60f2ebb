mod analyze;
mod cli;
mod config;
mod migration;
mod services;
mod source;
mod store;

use clap::Parser;
use env_logger::Env;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    cli::run(cli).await
}
