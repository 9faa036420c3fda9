use clap::Parser;
use playlist_interchange::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = playlist_interchange::run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(err.exit_code());
    }
}
