use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mongolink::config::{ConnectionParams, load_dotenv};
use mongolink::document::{parse_document, to_relaxed_json};
use mongolink::{DocumentCursor, MongoImporter, MongoSession};

/// Query a MongoDB collection or bulk-load JSON files into it.
///
/// Connection settings come from MONGO_HOST, MONGO_USER, MONGO_PASSWORD,
/// MONGO_DATABASE and MONGO_COLLECTION (optionally via a .env file).
#[derive(Parser)]
#[command(name = "mongolink", version, about)]
struct Cli {
    /// .env file to load (defaults to ./.env when present)
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print documents matching a filter
    Find {
        /// Filter as Extended JSON
        #[arg(long, default_value = "{}")]
        filter: String,

        /// Print only the first match
        #[arg(long)]
        one: bool,
    },
    /// Print documents where a key exists
    Exists {
        #[arg(long)]
        key: String,

        /// Match documents where the key is missing instead
        #[arg(long)]
        missing: bool,
    },
    /// Run mongoimport for every matching file and move each one when done
    Import {
        #[arg(long, default_value = "./input_data")]
        dir: PathBuf,

        /// File extension to pick up (case-insensitive)
        #[arg(long, default_value = "json")]
        ext: String,

        /// Where imported files go (defaults to <dir>/completed_data)
        #[arg(long)]
        completed_dir: Option<PathBuf>,

        /// mongoimport executable (searched for when omitted)
        #[arg(long)]
        tool: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    load_dotenv(cli.env_file.as_deref())?;
    let params = ConnectionParams::from_env().context("Failed to read connection settings")?;

    match cli.command {
        Commands::Find { filter, one } => {
            let filter = parse_document(&filter).context("Invalid --filter")?;
            let mut session = connect(params)?;
            if one {
                match session.find_one(filter)? {
                    Some(document) => println!("{}", to_relaxed_json(&document)),
                    None => log::info!("No document matched"),
                }
            } else {
                let count = print_documents(session.find_many(filter)?)?;
                log::info!("{count} document(s) matched");
            }
            session.disconnect();
        }
        Commands::Exists { key, missing } => {
            let mut session = connect(params)?;
            let count = print_documents(session.find_key_exists(&key, !missing)?)?;
            log::info!("{count} document(s) matched");
            session.disconnect();
        }
        Commands::Import { dir, ext, completed_dir, tool } => {
            let completed_dir = completed_dir.unwrap_or_else(|| dir.join("completed_data"));
            let mut importer = MongoImporter::new(params);
            if let Some(tool) = tool {
                importer = importer.with_tool_path(tool);
            }

            let imported = importer
                .import_directory(&dir, &ext, &completed_dir)
                .with_context(|| format!("Import from {} failed", dir.display()))?;

            for file in &imported {
                println!(
                    "import success: {} -> {} ({} documents)",
                    file.source.display(),
                    file.destination.display(),
                    file.summary.imported
                );
            }
        }
    }

    Ok(())
}

fn connect(params: ConnectionParams) -> Result<MongoSession> {
    let host = params.host.clone();
    let mut session = MongoSession::new(params)?;
    session
        .connect_client()
        .with_context(|| format!("Failed to connect to {host}"))?
        .connect_database()?
        .connect_collection()?;
    Ok(session)
}

fn print_documents(cursor: DocumentCursor<'_>) -> Result<usize> {
    let mut count = 0;
    for document in cursor {
        println!("{}", to_relaxed_json(&document?));
        count += 1;
    }
    Ok(count)
}
