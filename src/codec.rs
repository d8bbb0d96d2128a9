//! Little-endian wire helpers shared by the transaction, block and ledger
//! codecs. Field order and width are consensus-relevant.

use std::io::{Read, Write};

use crate::error::{LedgerError, Result};

pub fn read_u64<R: Read>(source: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    source
        .read_exact(&mut buf)
        .map_err(|e| LedgerError::MalformedInput(format!("Unexpected end of input: {}", e)))?;
    Ok(u64::from_le_bytes(buf))
}

pub fn read_array<const N: usize, R: Read>(source: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    source
        .read_exact(&mut buf)
        .map_err(|e| LedgerError::MalformedInput(format!("Unexpected end of input: {}", e)))?;
    Ok(buf)
}

pub fn read_vec<R: Read>(source: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    source
        .read_exact(&mut buf)
        .map_err(|e| LedgerError::MalformedInput(format!("Unexpected end of input: {}", e)))?;
    Ok(buf)
}

pub fn write_u64<W: Write>(sink: &mut W, value: u64) -> Result<()> {
    sink.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn write_bytes<W: Write>(sink: &mut W, bytes: &[u8]) -> Result<()> {
    sink.write_all(bytes)?;
    Ok(())
}
