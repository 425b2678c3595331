use std::path::Path;

use clap::{Args, Subcommand};
use gsim_common::config::Config;
use gsim_common::error::Result;
use tracing::info;

#[derive(Args, Debug)]
pub struct ClearArgs {
    #[command(subcommand)]
    pub target: ClearTarget,
}

#[derive(Subcommand, Debug)]
pub enum ClearTarget {
    /// Remove the per-platform winmower filesystem sandboxes
    WinmowerFs,
    /// Remove the entire artifact cache tree
    Cache,
}

impl ClearArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self.target {
            ClearTarget::WinmowerFs => {
                remove_tree(&config.winmower_fs_root())?;
                info!("Removed winmower filesystem sandboxes");
            }
            ClearTarget::Cache => {
                remove_tree(config.cache_root())?;
                info!("Removed artifact cache");
            }
        }
        Ok(())
    }
}

fn remove_tree(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    Ok(())
}
