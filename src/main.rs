use clap::Parser;
use state_weather::cli::{run, Cli};
use state_weather::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
