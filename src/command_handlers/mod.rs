pub mod dispatch;
pub mod info;
pub mod install;
pub mod uninstall;
pub mod verify;

use crate::cli::Cli;
use crate::fetch::default_cache_dir;
use crate::installer::Layout;
use crate::platform::{platform, resolve_prefix};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Everything a handler needs besides the formula, resolved once from flags and env.
#[derive(Debug, Clone)]
pub struct Context {
    pub host_os: String,
    pub layout: Layout,
    pub cache_dir: PathBuf,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let prefix = absolute(&resolve_prefix(cli.prefix.as_deref()))?;
        let mut layout = Layout::from_prefix(&prefix);
        if let Some(c) = &cli.cellar {
            layout.cellar = absolute(c)?;
        }
        if let Some(b) = &cli.bin_dir {
            layout.bin = absolute(b)?;
        }
        let cache_dir = match &cli.cache_dir {
            Some(c) => absolute(c)?,
            None => default_cache_dir(),
        };
        tracing::debug!(cellar = %layout.cellar.display(), bin = %layout.bin.display(), cache = %cache_dir.display(), "resolved layout");
        Ok(Self {
            host_os: platform().host_os().to_string(),
            layout,
            cache_dir,
        })
    }
}

// Symlink targets must not depend on the caller's working directory.
fn absolute(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(p))
    }
}
