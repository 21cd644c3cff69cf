use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, OpContext, STARTING_COINS};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod prompt;

#[derive(Parser, Debug)]
#[command(name = "merch_admin")]
#[command(about = "Admin utilities for the merch store (accounts and catalog)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./merch_store.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Account(Account),
    Item(Item),
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create an account; the password is prompted.
    Create(AccountCreateArgs),
    Show(AccountShowArgs),
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    #[arg(long)]
    handle: String,
    /// Opening balance.
    #[arg(long, default_value_t = STARTING_COINS)]
    coins: i64,
}

#[derive(Args, Debug)]
struct AccountShowArgs {
    #[arg(long)]
    handle: String,
}

#[derive(Args, Debug)]
struct Item {
    #[command(subcommand)]
    command: ItemCommand,
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    Add(ItemAddArgs),
    List,
}

#[derive(Args, Debug)]
struct ItemAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: i64,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;
    let ctx = OpContext::new();

    match cli.command {
        Command::Account(Account {
            command: AccountCommand::Create(args),
        }) => {
            let (handle, password) = prompt::new_account_password(&args.handle, args.coins)?;
            let hash = server::password::hash(&password, server::password::DEFAULT_COST)?;

            let account = match engine
                .register_account(&ctx, &handle, &hash, args.coins)
                .await
            {
                Ok(account) => account,
                Err(engine::EngineError::AlreadyExists(handle)) => {
                    eprintln!("account already exists: {handle}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            println!(
                "created account: {} (id {}, {} coins)",
                account.handle, account.id, account.coins
            );
        }
        Command::Account(Account {
            command: AccountCommand::Show(args),
        }) => {
            let credentials = match engine.credentials(&ctx, &args.handle).await {
                Ok(credentials) => credentials,
                Err(err) if err.is_not_found() => {
                    eprintln!("account not found: {}", args.handle);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            let info = engine.user_info(&ctx, credentials.account_id).await?;
            println!("{} (id {})", credentials.handle, credentials.account_id);
            println!("coins: {}", info.coins);
            for item in info.inventory {
                println!("  {} x{}", item.name, item.quantity);
            }
            println!(
                "transfers: {} received, {} sent",
                info.coin_history.received.len(),
                info.coin_history.sent.len()
            );
        }
        Command::Item(Item {
            command: ItemCommand::Add(args),
        }) => {
            let item = match engine.add_item(&ctx, &args.name, args.price).await {
                Ok(item) => item,
                Err(
                    err @ (engine::EngineError::AlreadyExists(_)
                    | engine::EngineError::InvalidAmount(_)
                    | engine::EngineError::InvalidInput(_)),
                ) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            };
            println!("added item: {} (id {}, price {})", item.name, item.id, item.price);
        }
        Command::Item(Item {
            command: ItemCommand::List,
        }) => {
            for item in engine.catalog(&ctx).await? {
                println!("{:>4}  {:<16} {:>6}", item.id, item.name, item.price);
            }
        }
    }

    Ok(())
}
