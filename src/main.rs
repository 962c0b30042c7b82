use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = vibepitch::cli::Cli::parse();
    vibepitch::run(cli).await
}
