use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;

use jungle_api::config::Config;
use jungle_api::database::{self, schema};
use jungle_api::services::api_keys;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Command-line utility for administering jungle-api.
/// Manages issued API keys and the database schema.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Commands for managing issued API keys.
    Keys {
        #[command(subcommand)]
        keys_command: KeysCommand,
    },
    /// Commands for managing the database.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Issues a new API key and prints it.
    New {
        /// Label stored next to the key.
        #[arg(short, long)]
        name: String,
    },
    /// Revokes (deactivates) an API key by its ID.
    Revoke {
        #[arg(short, long)]
        id: i32,
    },
    /// Prints all issued keys as JSON.
    List,
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Creates the schema and preloads the demo animals.
    Seed,
    /// Drops ALL tables from the database. Use with caution!
    Wipe {
        /// Required confirmation flag.
        #[arg(long)]
        yes: bool,
    },
}

async fn connect(config: &Config) -> Result<DatabaseConnection, Box<dyn std::error::Error>> {
    let db = database::connect_from_url(&config.effective_database_url()).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db = connect(&config).await?;

    match cli.command {
        Commands::Keys { keys_command } => match keys_command {
            KeysCommand::New { name } => {
                let key = api_keys::issue(&db, &name).await?;
                println!("Issued key '{}' (id {}): {}", key.name, key.id, key.key);
            }
            KeysCommand::Revoke { id } => {
                let key = api_keys::revoke(&db, id).await?;
                println!("Revoked key '{}' (id {})", key.name, key.id);
            }
            KeysCommand::List => {
                let keys = api_keys::list(&db).await?;
                println!("{}", serde_json::to_string_pretty(&keys)?);
            }
        },
        Commands::Db { db_command } => match db_command {
            DbCommand::Seed => {
                schema::create_tables(&db).await?;
                schema::seed_animals(&db).await?;
                println!("Schema created and seed animals loaded.");
            }
            DbCommand::Wipe { yes } => {
                if !yes {
                    return Err("Refusing to wipe without --yes".into());
                }
                schema::drop_tables(&db).await?;
                println!("All tables dropped.");
            }
        },
    }

    Ok(())
}
