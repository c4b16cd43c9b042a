mod package;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

/// Packages the chat server and the built client into one directory.
#[derive(Parser, Debug)]
#[command(name = "chatter-dist", version, about = "Build a distributable Chatter folder")]
struct Args {
    /// Output directory. Removed and recreated on every run.
    #[arg(long, default_value = "dist", value_name = "DIR")]
    out: PathBuf,

    /// Built client assets (index.html and friends).
    #[arg(long, default_value = "client/dist", value_name = "DIR")]
    client_dir: PathBuf,

    /// Cargo target directory holding the release build.
    #[arg(long, default_value = "target", value_name = "DIR")]
    target_dir: PathBuf,

    /// Port written into the packaged .env.
    #[arg(long, default_value_t = 3002)]
    port: u16,

    /// Use an existing release build instead of running cargo.
    #[arg(long)]
    skip_build: bool,
}

const SERVER_PACKAGE: &str = "chatter-server";
const SERVER_BIN: &str = "chatter";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatter_dist=info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("Build failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    info!("Step 1: clean {}", args.out.display());
    package::clean_dir(&args.out)?;

    if args.skip_build {
        info!("Step 2: skipping cargo build");
    } else {
        info!("Step 2: build {}", SERVER_PACKAGE);
        package::build_server(SERVER_PACKAGE)?;
    }

    info!("Step 3: copy server binary");
    package::copy_server_binary(&args.target_dir, SERVER_BIN, &args.out)?;

    info!("Step 4: copy client assets");
    if args.client_dir.is_dir() {
        let count = package::copy_dir(&args.client_dir, &args.out.join(package::PUBLIC_DIR))?;
        info!("Copied {} client files", count);
    } else {
        warn!(
            "Client directory {} not found; packaging API only",
            args.client_dir.display()
        );
    }

    info!("Step 5: write .env");
    package::write_env(&args.out, args.port)?;

    info!("Step 6: write README.md");
    package::write_readme(&args.out, SERVER_BIN, args.port)?;

    info!("Build complete: {}", args.out.display());
    info!("Run with: cd {} && ./{}", args.out.display(), SERVER_BIN);
    Ok(())
}
