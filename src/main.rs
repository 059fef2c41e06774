use anyhow::Result;
use clap::{Parser, Subcommand};

use ledgerkeep::cli::{
    handle_account_command, handle_advise, handle_audit, handle_report_command,
    handle_seed_demo, handle_transaction_command, AccountCommands, ReportCommands,
    TransactionCommands,
};
use ledgerkeep::config::{LedgerPaths, Settings};
use ledgerkeep::store::JsonStore;

#[derive(Parser)]
#[command(
    name = "ledgerkeep",
    version,
    about = "Personal finance ledger with a consistency-checked balance cache",
    long_about = "Ledgerkeep tracks accounts, income, and expenses. Every write keeps \
                  each account balance in step with its transaction history, and the \
                  audit command can verify and repair balances from the log at any time."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Reports over the transaction history
    #[command(subcommand)]
    Report(ReportCommands),

    /// Verify cached balances against the transaction log
    Audit {
        /// Rewrite drifted balances from the log
        #[arg(long)]
        repair: bool,
    },

    /// AI commentary over recent activity
    Advise,

    /// Populate an empty ledger with demo data
    SeedDemo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    paths.ensure_directories()?;
    let settings = Settings::load_or_create(&paths)?;
    let store = JsonStore::open(paths.ledger_file())?;

    match cli.command {
        Commands::Account(command) => handle_account_command(&store, &settings, command),
        Commands::Transaction(command) => handle_transaction_command(&store, &settings, command),
        Commands::Report(command) => handle_report_command(&store, &settings, command),
        Commands::Audit { repair } => handle_audit(&store, &settings, repair),
        Commands::Advise => handle_advise(&store, &settings),
        Commands::SeedDemo => handle_seed_demo(&store, &settings),
    }
}
