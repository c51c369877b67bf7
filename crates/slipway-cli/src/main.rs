mod cmd;
mod confirm;
mod root;

use clap::{Parser, Subcommand};
use slipway_core::SlipwayError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "slipway",
    about = "Idempotent build/push/deploy pipeline for a containerized service",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from deploy.yaml or .git/)
    #[arg(long, global = true, env = "SLIPWAY_ROOT")]
    root: Option<PathBuf>,

    /// Deploy context override (default: kubectl current-context)
    #[arg(long, global = true, env = "SLIPWAY_CONTEXT")]
    context: Option<String>,

    /// Skip interactive confirmation prompts
    #[arg(long, short = 'y', global = true, env = "SLIPWAY_YES")]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run flake8 (and spectral, when an openapi.yaml exists)
    Lint,

    /// Install python dependencies from requirements.txt
    Deps,

    /// Run the pytest suite
    Test,

    /// Build the container image and record the build marker
    Build,

    /// Publish the built image to the configured registry
    Push,

    /// Run the full pipeline: build, publish, namespace, secrets, install
    Deploy {
        /// Rebuild even when a build marker exists
        #[arg(long)]
        force: bool,
    },

    /// Uninstall the release and delete its namespace
    Undeploy,

    /// Undeploy then deploy, under a single confirmation
    Redeploy,

    /// Dump the database to $BACKUP_DIR (default: backups/)
    Backup,

    /// Restore a database dump taken by 'slipway backup'
    Restore {
        /// Path to the .sql dump file
        dump: PathBuf,
    },

    /// (Re)generate namespace-scoped secrets
    Secrets,

    /// Run the last-built image locally via docker
    Run,

    /// Stop the locally running container
    Stop,

    /// Remove stage markers and the locally built image
    Clean,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Deploy { .. }
        | Commands::Undeploy
        | Commands::Redeploy
        | Commands::Build
        | Commands::Push => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let context = cli.context.as_deref();

    let result = match cli.command {
        Commands::Lint => cmd::dev::lint(&root),
        Commands::Deps => cmd::dev::deps(&root),
        Commands::Test => cmd::dev::test(&root),
        Commands::Build => cmd::image::build(&root, context),
        Commands::Push => cmd::image::push(&root, context),
        Commands::Deploy { force } => cmd::deploy::deploy(&root, context, cli.yes, force),
        Commands::Undeploy => cmd::deploy::undeploy(&root, context, cli.yes),
        Commands::Redeploy => cmd::deploy::redeploy(&root, context, cli.yes),
        Commands::Backup => cmd::db::backup(&root, context),
        Commands::Restore { dump } => cmd::db::restore(&root, context, cli.yes, &dump),
        Commands::Secrets => cmd::secrets::run(&root, context),
        Commands::Run => cmd::local::run(&root),
        Commands::Stop => cmd::local::stop(&root),
        Commands::Clean => cmd::clean::run(&root),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        // Propagate the failing external tool's exit code where available
        let code = e
            .downcast_ref::<SlipwayError>()
            .and_then(SlipwayError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
