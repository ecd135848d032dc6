use clap::Parser;
use tracing::Level;
use vgrush::{run_vgrush, Args};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    run_vgrush(args)?;
    Ok(())
}
