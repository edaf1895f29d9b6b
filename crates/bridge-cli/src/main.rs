mod cmd;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ticket-bridge",
    about = "File tracker issues for engineering-bug tickets and write them back to the sheet",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the trigger endpoints (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one reconciliation pass and exit
    Process {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { port: None });

    let default_level = match &command {
        Commands::Serve { .. } => tracing::Level::INFO,
        Commands::Process { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match command {
        Commands::Serve { port } => cmd::serve::run(port),
        Commands::Process { json } => cmd::process::run(json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
