//! Datastore layout and load/save helpers shared by the command-line driver

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::account::{address_to_hex, Address, Private};
use crate::container::Container;
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;

const ACCOUNTS_DIR: &str = "accounts";
const LEDGER_FILE: &str = "ledger";

/// Directory holding sealed account containers.
pub fn accounts_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(ACCOUNTS_DIR)
}

/// Path of the serialized chain.
pub fn ledger_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEDGER_FILE)
}

/// Path of the container holding the account with the given address.
pub fn container_path(data_dir: &Path, address: &Address) -> PathBuf {
    accounts_dir(data_dir).join(format!("{}.json", address_to_hex(address)))
}

/// Store a sealed account container under its address.
pub fn store_account(data_dir: &Path, passphrase: &[u8], account: &Private) -> Result<PathBuf> {
    let dir = accounts_dir(data_dir);
    fs::create_dir_all(&dir)
        .map_err(|e| LedgerError::WalletError(format!("Could not create account folder: {}", e)))?;
    let container = Container::new(passphrase, account)?;
    let path = container_path(data_dir, &account.address());
    container.save(&path)?;
    info!("Stored account container at {}", path.display());
    Ok(path)
}

/// Unlock the account stored under the given address.
pub fn unlock_account(data_dir: &Path, address: &Address, passphrase: &[u8]) -> Result<Private> {
    let path = container_path(data_dir, address);
    let container = Container::load(&path)?;
    container.unlock(passphrase)
}

/// Addresses of all stored account containers.
pub fn list_accounts(data_dir: &Path) -> Result<Vec<String>> {
    let dir = accounts_dir(data_dir);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut addresses = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem() {
                addresses.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    addresses.sort();
    Ok(addresses)
}

/// Read and re-verify the stored chain.
pub fn load_ledger(data_dir: &Path) -> Result<Ledger> {
    let path = ledger_path(data_dir);
    let file = File::open(&path)
        .map_err(|e| LedgerError::IoError(format!("Could not open ledger file: {}", e)))?;
    let mut reader = BufReader::new(file);
    let mut ledger = Ledger::new(0);
    ledger.read_from(&mut reader)?;
    info!(
        "Loaded ledger with {} blocks on chain {}",
        ledger.len(),
        ledger.chain
    );
    Ok(ledger)
}

/// Write the chain out atomically: serialize to a temporary file, then
/// rename over the target.
pub fn save_ledger(data_dir: &Path, ledger: &Ledger) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = ledger_path(data_dir);
    let temp_path = path.with_extension("tmp");

    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    ledger.write_to(&mut writer)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&temp_path, &path)?;
    info!("Wrote {} blocks to {}", ledger.len(), path.display());
    Ok(())
}

/// Prompt for a passphrase on stdin.
pub fn prompt_passphrase(prompt: &str) -> Result<Vec<u8>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).as_bytes().to_vec())
}
