#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use tallychain::account::{address_from_hex, address_to_hex, Private};
use tallychain::block::Block;
use tallychain::cli::{
    ledger_path, list_accounts, load_ledger, prompt_passphrase, save_ledger, store_account,
    unlock_account,
};
use tallychain::config::{load_config, Config};
use tallychain::economics::{block_reward, calculate_fee};
use tallychain::ledger::Ledger;
use tallychain::miner;
use tallychain::transaction::Transaction;

#[derive(Parser)]
#[command(name = "tally", about = "Distributed cryptographic ledger", version)]
struct Cli {
    /// Path to chain storage
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account
    New,
    /// List stored accounts
    Accounts,
    /// Initialize a new blockchain
    Init {
        /// Address of the private account receiving the genesis coinbase
        #[arg(long)]
        account: String,
        /// Unique chain identifier
        #[arg(long)]
        chain: Option<u64>,
        /// Starting complexity for the genesis block
        #[arg(long)]
        complexity: Option<u64>,
        /// Override all existing data
        #[arg(long)]
        force: bool,
    },
    /// View chain state
    Inspect,
    /// Verify the stored chain structure
    Verify,
    /// Display funds associated with an account
    Funds {
        #[arg(long)]
        account: String,
    },
    /// Find a new block and get rewarded
    Mine {
        #[arg(long)]
        account: String,
    },
    /// Transfer funds from your account
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u64,
        /// Optional payload recorded with the transfer
        #[arg(long)]
        payload: Option<String>,
    },
}

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

fn mine(config: &Config, block: &Block) -> Block {
    if config.miner.threads == 0 {
        miner::find(block)
    } else {
        miner::find_with_threads(block, config.miner.threads)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config()?;
    let data_dir = cli
        .data
        .unwrap_or_else(|| PathBuf::from(&config.node.data_dir));

    match cli.command {
        Command::New => {
            let passphrase = prompt_passphrase("Please enter a passphrase: ")?;
            let account = Private::generate();
            store_account(&data_dir, &passphrase, &account)?;
            println!(
                "Created account with address {}",
                address_to_hex(&account.address()).green()
            );
        }
        Command::Accounts => {
            let accounts = list_accounts(&data_dir)?;
            if accounts.is_empty() {
                println!("No accounts stored under {}", data_dir.display());
            }
            for address in accounts {
                println!("{}", address);
            }
        }
        Command::Init {
            account,
            chain,
            complexity,
            force,
        } => {
            let path = ledger_path(&data_dir);
            if path.exists() && !force {
                return Err(format!(
                    "Chain already exists at {}, override with --force",
                    path.display()
                )
                .into());
            }
            let address = address_from_hex(&account)?;
            let passphrase = prompt_passphrase("Please enter the passphrase: ")?;
            let key = unlock_account(&data_dir, &address, &passphrase)?;

            let chain = chain.unwrap_or(config.node.chain);
            let complexity = complexity.unwrap_or(config.node.complexity);
            println!(
                "Init chain with ID {} and start complexity {}",
                chain, complexity
            );

            let mut ledger = Ledger::new(chain);
            ledger.init(complexity, &key, now())?;
            save_ledger(&data_dir, &ledger)?;
            println!("{}", ledger.last()?.to_string().green());
        }
        Command::Inspect => {
            let ledger = load_ledger(&data_dir)?;
            for block in &ledger.blocks {
                println!("{}", block.to_string().bold());
                for tx in &block.transactions {
                    println!("  {}", tx);
                }
            }
            println!(
                "{} blocks, {} known addresses",
                ledger.len(),
                ledger.addresses.len()
            );
        }
        Command::Verify => {
            // Reading the file replays every block through the full append
            // discipline.
            let ledger = load_ledger(&data_dir)?;
            println!(
                "{} Chain {} is valid up to {}",
                "OK".green(),
                ledger.chain,
                ledger.last()?.fingerprint()
            );
        }
        Command::Funds { account } => {
            let address = address_from_hex(&account)?;
            let ledger = load_ledger(&data_dir)?;
            println!("{}", ledger.addresses.funds(&address));
        }
        Command::Mine { account } => {
            let address = address_from_hex(&account)?;
            let passphrase = prompt_passphrase("Please enter the passphrase: ")?;
            let key = unlock_account(&data_dir, &address, &passphrase)?;

            let mut ledger = load_ledger(&data_dir)?;
            let prev = ledger.last()?.clone();
            let timestamp = now().max(prev.timestamp);
            let mut block = Block::next(&prev, timestamp);
            block.push(Transaction::coinbase(
                ledger.chain,
                &key,
                block_reward(block.complexity, &[]),
                timestamp,
            )?);

            let mined = mine(&config, &block);
            ledger.append(mined)?;
            save_ledger(&data_dir, &ledger)?;

            println!("Mined {}", ledger.last()?.to_string().green());
            println!("Funds: {}", ledger.addresses.funds(&address));
        }
        Command::Transfer {
            from,
            to,
            amount,
            payload,
        } => {
            let from_address = address_from_hex(&from)?;
            let to_address = address_from_hex(&to)?;
            let passphrase = prompt_passphrase("Please enter the passphrase: ")?;
            let key = unlock_account(&data_dir, &from_address, &passphrase)?;

            let mut ledger = load_ledger(&data_dir)?;
            let prev = ledger.last()?.clone();
            let timestamp = now().max(prev.timestamp);
            let mut block = Block::next(&prev, timestamp);

            let payload = payload.map(String::into_bytes).unwrap_or_default();
            let fee = calculate_fee(payload.len() as u64, block.complexity);
            let transfer = Transaction::transfer(
                ledger.chain,
                amount,
                fee,
                &key,
                to_address,
                payload,
                timestamp,
            )?;

            // The sender mines its own confirmation block and collects the
            // transfer fee back through the coinbase.
            let reward = block_reward(block.complexity, std::slice::from_ref(&transfer));
            block.push(Transaction::coinbase(ledger.chain, &key, reward, timestamp)?);
            block.push(transfer);

            let mined = mine(&config, &block);
            ledger.append(mined)?;
            save_ledger(&data_dir, &ledger)?;

            println!(
                "Transferred {} to {}",
                amount.to_string().bold(),
                address_to_hex(&to_address)
            );
            println!(
                "Sender funds: {}; recipient funds: {}",
                ledger.addresses.funds(&from_address),
                ledger.addresses.funds(&to_address)
            );
        }
    }
    Ok(())
}
