mod config;
mod edit_cmd;
mod seed_cmd;
mod show_cmd;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use caseline_core::service::{LinkResolver, RecordNavigator};
use caseline_db::pool;

use config::CaselineConfig;

#[derive(Parser)]
#[command(name = "caseline", about = "Case product-line editor")]
struct Cli {
    /// Database URL (overrides CASELINE_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a caseline config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/caseline")]
        db_url: String,
        /// Base URL record view links are resolved against
        #[arg(long, default_value = config::DEFAULT_BASE_URL)]
        base_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the caseline database (create + migrate)
    DbInit,
    /// Insert a demo case with contact, product, and plan catalog
    Seed,
    /// Show a case's context and product lines
    Show {
        /// Case ID to show
        case_id: String,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the plan catalog and selection options for a case
    Plans {
        /// Case ID to resolve the catalog scope from
        case_id: String,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Apply a scripted edit session to a case's product lines
    Edit {
        /// Case ID to edit
        case_id: String,
        /// Operations, applied in order: add, remove:<idx>,
        /// plan:<idx>=<label>, price:<idx>=<value>, discount:<idx>=<value>
        #[arg(long = "op")]
        ops: Vec<String>,
        /// Save at the end of the session
        #[arg(long)]
        save: bool,
        /// Cancel at the end of the session
        #[arg(long, conflicts_with = "save")]
        cancel: bool,
    },
    /// Resolve the view URL for a record
    Url {
        /// Record ID to resolve
        record_id: String,
    },
}

/// Execute the `caseline init` command: write the config file.
fn cmd_init(db_url: &str, base_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        navigation: config::NavigationSection {
            base_url: base_url.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  navigation.base_url = {base_url}");
    println!();
    println!("Next: run `caseline db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `caseline db-init` command: create database and migrate.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = CaselineConfig::resolve(cli_db_url)?;

    println!("Initializing caseline database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect to the target database.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    // 3. Run migrations.
    pool::run_migrations(&db_pool).await?;

    // 4. Print success with table counts.
    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    // 5. Clean shutdown.
    db_pool.close().await;

    println!("caseline db-init complete.");
    Ok(())
}

fn parse_id(kind: &str, value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("invalid {kind} ID: {value}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            base_url,
            force,
        } => {
            cmd_init(&db_url, &base_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Seed => {
            let resolved = CaselineConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = seed_cmd::run_seed(&db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Show { case_id, json } => {
            let resolved = CaselineConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let id = parse_id("case", &case_id)?;
            let result = show_cmd::run_show(&db_pool, &resolved.base_url, id, json).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plans { case_id, json } => {
            let resolved = CaselineConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let id = parse_id("case", &case_id)?;
            let result = show_cmd::run_plans(&db_pool, &resolved.base_url, id, json).await;
            db_pool.close().await;
            result?;
        }
        Commands::Edit {
            case_id,
            ops,
            save,
            cancel,
        } => {
            let resolved = CaselineConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let id = parse_id("case", &case_id)?;
            let result =
                edit_cmd::run_edit(&db_pool, &resolved.base_url, id, &ops, save, cancel).await;
            db_pool.close().await;
            result?;
        }
        Commands::Url { record_id } => {
            let resolved = CaselineConfig::resolve(cli.database_url.as_deref())?;
            let id = parse_id("record", &record_id)?;
            let resolver = LinkResolver::new(resolved.base_url);
            let url = resolver.record_url(id).await?;
            println!("{url}");
        }
    }

    Ok(())
}
