use clap::Parser;
use ytdl_gateway::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(err) = cli::run(args).await {
        eprintln!("ytdl-gateway error: {err:#}");
        std::process::exit(1);
    }
}
