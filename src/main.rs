//! CLI entry point for kiji

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kiji")]
#[command(version)]
#[command(about = "A static site generator for MDX article collections and JSON-backed listings", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new document
    New {
        /// Title of the new document
        title: String,

        /// Collection to create it in (defaults to the first configured)
        #[arg(short = 'C', long)]
        collection: Option<String>,

        /// Slug, may contain `/` (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// What to list (docs, collections, components, datasets, categories)
        #[arg(default_value = "docs")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug { "kiji=debug,info" } else { "kiji=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            kiji::commands::init::init_site(&target_dir)?;
            println!("Initialized kiji site in {:?}", target_dir);
        }

        Commands::New {
            title,
            collection,
            slug,
        } => {
            let site = kiji::Site::new(&base_dir)?;
            kiji::commands::new::create_document(
                &site,
                &title,
                collection.as_deref(),
                slug.as_deref(),
            )?;
        }

        Commands::Generate { watch } => {
            let site = kiji::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                kiji::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server { port, ip, open } => {
            let site = kiji::Site::new(&base_dir)?;

            // Pages render on request; the static build serves index.json and assets
            tracing::info!("Generating static files...");
            if let Err(e) = site.generate() {
                tracing::warn!("Generation finished with errors: {:#}", e);
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            kiji::server::start(&site, &ip, port, open).await?;
        }

        Commands::Clean => {
            let site = kiji::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = kiji::Site::new(&base_dir)?;
            kiji::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("kiji version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
