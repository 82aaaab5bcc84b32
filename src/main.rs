mod commands;
mod errors;
mod libs;
mod logger;
mod schemas;

use clap::Parser;
use commands::install::{self, InstallOptions};

#[derive(Parser)]
#[command(name = "nerdfonts-installer")]
#[command(version, about = "Install Nerd Fonts from the latest GitHub release", long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    debug: bool,

    /// Install missing system packages without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Path to an alternative config.yaml
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nCleaning up and exiting...");
        install::cleanup_active_scratch_dir();
        std::process::exit(130);
    }) {
        log_warn!("Could not install interrupt handler: {}", e);
    }

    let options = InstallOptions {
        config: cli.config,
        assume_yes: cli.yes,
    };

    if let Err(e) = install::run(options) {
        log_error!("{:#}", e);
        std::process::exit(1);
    }
}
