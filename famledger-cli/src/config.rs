use anyhow::{Context, Result};
use famledger_core::{Currency, Roster};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_famledger_home, famledger_home};

/// Comma-separated member list that overrides `[family] members`
pub const MEMBERS_ENV: &str = "FAMILY_MEMBERS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub family: FamilySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySection {
    #[serde(default = "default_members")]
    pub members: Vec<String>,
    /// ISO code, one of AED, USD, EUR
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for FamilySection {
    fn default() -> Self {
        Self {
            members: default_members(),
            currency: default_currency(),
        }
    }
}

fn default_members() -> Vec<String> {
    vec!["Alex".to_string(), "Jamie".to_string(), "Sam".to_string()]
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

impl Config {
    pub fn currency(&self) -> Result<Currency> {
        self.family
            .currency
            .parse()
            .with_context(|| format!("invalid [family] currency in {}", display_config_path()))
    }

    pub fn roster(&self) -> Result<Roster> {
        Roster::new(&self.family.members).context("invalid [family] members")
    }

    /// Replace members with the `FAMILY_MEMBERS` list when it is set and non-empty.
    pub fn apply_env(&mut self, raw: Option<&str>) {
        if let Some(members) = raw.map(split_members).filter(|m| !m.is_empty()) {
            tracing::debug!(count = members.len(), "members taken from {MEMBERS_ENV}");
            self.family.members = members;
        }
    }
}

pub fn split_members(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(famledger_home()?.join("config.toml"))
}

fn display_config_path() -> String {
    config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "config.toml".to_string())
}

pub fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Config file (or defaults) with the environment override applied
pub fn load_config() -> Result<Config> {
    let mut cfg = read_config(&config_path()?)?;
    cfg.apply_env(std::env::var(MEMBERS_ENV).ok().as_deref());
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_famledger_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
