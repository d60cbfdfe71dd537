use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$FAMLEDGER_HOME`, else `$HOME/.famledger`
pub fn famledger_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("FAMLEDGER_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set (or set FAMLEDGER_HOME)")?;
    Ok(PathBuf::from(home).join(".famledger"))
}

pub fn ensure_famledger_home() -> Result<PathBuf> {
    let dir = famledger_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
