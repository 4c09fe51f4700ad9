use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_pointrec_home;

/// Test accounts excluded from every view. This is the reference
/// deployment's set; operators override it via config.toml.
const DEFAULT_DENYLIST: &[&str] = &[
    "TMPDScb32d04b64d94a9",
    "TMPDS4abdb524d673492",
    "TMPDS5254acb93dbe46c",
    "TMPDSa2686c826a28485",
    "TMPDS6a4757e6a3c34cc",
    "TMPDSc53c81cb026f488",
    "TMPDS067d9b743d17463",
    "TMPDS43098c59653c486",
    "TMPDS21c02640426e436",
    "TMPDS8b09cd30f54e476",
    "TMPDSd27bf78fb8e546a",
    "TMPDSd5034a6fbad64be",
    "TMPDS77970861beae492",
    "TMPDS28c045ff094843a",
    "TMPDS4ccba6a2a15040e",
    "TMPDS731a0fb561354e0",
    "TMPDS9fb6acec8fe14b8",
    "TMPDSa9f21742c6e1b84",
    "TMPDSe5a4afa77d6346f",
    "TMPDS1e7083124613423",
    "TMPDSabb9d72cecd244d",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub denylist: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn denylist_set(&self) -> HashSet<String> {
        self.denylist.iter().cloned().collect()
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_pointrec_home()?.join("config.toml"))
}

/// Load the config at `path` (or the default location), falling back to the
/// built-in defaults when no file exists.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
