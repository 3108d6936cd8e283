//! ForgeBank CLI - account operations over the JSON ledger files.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use forgebank_core::{AccountError, Iban};
use forgebank_infra::{AccountManager, JsonFileStore, StoreConfig};

#[derive(Parser)]
#[command(name = "forgebank")]
#[command(about = "ForgeBank - transfers, deposits and balances", long_about = None)]
struct Cli {
    /// Data directory (overrides FORGEBANK_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a transfer request and print its transfer code
    Transfer {
        /// Source IBAN
        from: String,
        /// Destination IBAN
        to: String,
        /// Free-text concept (two or more words)
        #[arg(long)]
        concept: String,
        /// ORDINARY, INMEDIATE or URGENT
        #[arg(long = "type", default_value = "ORDINARY")]
        transfer_type: String,
        /// Execution date, DD/MM/YYYY
        #[arg(long)]
        date: String,
        /// Amount in EUR
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },

    /// Record the deposit described by an intent file and print its signature
    Deposit {
        /// Path to the JSON intent file
        file: PathBuf,
    },

    /// Compute the balance of an account from the transaction log
    Balance {
        /// Account IBAN
        iban: String,
    },

    /// Print previously computed balances of an account
    History {
        /// Account IBAN
        iban: String,
    },

    /// Print a stored transfer
    ShowTransfer {
        /// Transfer code
        code: String,
    },

    /// Print a stored deposit
    ShowDeposit {
        /// Deposit signature
        signature: String,
    },

    /// Validate an IBAN
    CheckIban {
        iban: String,
    },

    /// Build a Spanish IBAN from its 20-digit BBAN
    IbanFor {
        bban: String,
    },
}

fn main() -> ExitCode {
    forgebank_observability::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<AccountError>() {
                Some(account_err) => eprintln!("{}: {}", account_err.kind(), account_err.message()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn store_config(data_dir: Option<PathBuf>) -> StoreConfig {
    match data_dir {
        Some(dir) => StoreConfig::in_dir(dir),
        None => StoreConfig::from_env(),
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = store_config(cli.data_dir);
    tracing::debug!(?config, "store configuration");
    let mngr = AccountManager::new(JsonFileStore::new(config));

    let output = match cli.command {
        Commands::Transfer {
            from,
            to,
            concept,
            transfer_type,
            date,
            amount,
        } => mngr.submit_transfer(&from, &to, &concept, &transfer_type, &date, &amount)?,

        Commands::Deposit { file } => mngr.record_deposit(&file)?,

        Commands::Balance { iban } => mngr.get_balance(&iban)?.to_string(),

        Commands::History { iban } => {
            let history = mngr.balance_history(&iban)?;
            serde_json::to_string_pretty(&history).context("rendering balance history")?
        }

        Commands::ShowTransfer { code } => {
            let record = mngr
                .find_transfer(&code)?
                .with_context(|| format!("no transfer with code {code}"))?;
            serde_json::to_string_pretty(&record).context("rendering transfer")?
        }

        Commands::ShowDeposit { signature } => {
            let record = mngr
                .find_deposit(&signature)?
                .with_context(|| format!("no deposit with signature {signature}"))?;
            serde_json::to_string_pretty(&record).context("rendering deposit")?
        }

        Commands::CheckIban { iban } => Iban::parse(&iban)?.to_string(),

        Commands::IbanFor { bban } => Iban::from_bban(&bban)?.to_string(),
    };

    Ok(output)
}
