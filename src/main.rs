use std::path::PathBuf;

use brepl::{Shell, ShellConfig, SocketId, StdinReader};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "brepl")]
#[command(about = "Evaluate JavaScript in a browser extension through beval", long_about = None)]
#[command(version)]
struct Cli {
    /// Socket id to connect to at startup
    #[arg(short, long, default_value = "0")]
    socket: SocketId,

    /// Directory containing beval.socket.* files (defaults to the temp dir)
    #[arg(long, env = "BEVAL_SOCKET_DIR")]
    socket_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("brepl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = ShellConfig::builder().socket_id(cli.socket);
    if let Some(dir) = cli.socket_dir {
        builder = builder.socket_dir(dir);
    }
    let config = builder.build()?;

    let mut shell = Shell::new(&config, StdinReader::new(), std::io::stdout());
    shell.run().await?;

    Ok(())
}
