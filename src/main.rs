mod archive;
mod cli;
mod format;
mod ids;
mod query;
mod session;

pub const USER_AGENT: &str = concat!("wbdocs/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wbdocs=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
