use crate::command_handlers::Context;
use crate::formula::Formula;
use crate::installer;
use anyhow::{Context as _, Result};

pub fn run_uninstall(formula: &Formula, ctx: &Context) -> Result<()> {
    let meta = &formula.metadata;
    let out = installer::uninstall(&ctx.layout, meta)
        .with_context(|| format!("uninstalling {} {}", meta.name, meta.version))?;
    if !out.removed_link && !out.removed_keg {
        println!("{} {} is not installed", meta.name, meta.version);
        return Ok(());
    }
    if out.removed_link {
        println!("Unlinked {}", ctx.layout.link(meta).display());
    }
    if out.removed_keg {
        println!("Removed {}", ctx.layout.keg(meta).display());
    }
    Ok(())
}
