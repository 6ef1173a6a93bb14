use crate::command_handlers::Context;
use crate::digest::verify_file;
use crate::formula::{Formula, PackageMetadata, ResolvedDownload};
use crate::installer::{self, InstallOutcome};
use crate::receipt::InstallReceipt;
use crate::fetch;
use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;

pub struct InstallArgs<'a> {
    pub archive: Option<&'a Path>,
    pub verify: bool,
    pub formula: &'a Formula,
    pub ctx: &'a Context,
}

pub fn run_install(args: InstallArgs) -> Result<()> {
    let meta = &args.formula.metadata;
    let download = args.formula.resolve_download(&args.ctx.host_os)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Installing {} {}", meta.name, meta.version));

    let result = install_with(&args, &download, &pb);

    match result {
        Ok(outcome) => {
            pb.finish_with_message(format!("Installed {} {}", meta.name, meta.version));
            println!("{} -> {}", outcome.link.display(), outcome.executable.display());
            path_hint(meta, &outcome);
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message(format!("FAILED {} {}", meta.name, meta.version));
            Err(e)
        }
    }
}

/// Obtain and verify the archive, install it, then write the receipt. The
/// digest check runs before anything under the cellar is touched.
fn install_with(
    args: &InstallArgs,
    download: &ResolvedDownload,
    pb: &ProgressBar,
) -> Result<InstallOutcome> {
    let meta = &args.formula.metadata;
    let archive = match args.archive {
        Some(path) => {
            if args.verify {
                verify_file(path, &download.expected_digest)
                    .with_context(|| format!("verifying {}", path.display()))?;
            } else {
                tracing::warn!(archive = %path.display(), "checksum verification skipped");
            }
            path.to_path_buf()
        }
        None => fetch::fetch(&Client::new(), download, &args.ctx.cache_dir, Some(pb))
            .with_context(|| format!("fetching {}", download.url))?,
    };
    let outcome = installer::install(&archive, &args.ctx.layout, meta, Some(pb))
        .with_context(|| format!("installing {} {}", meta.name, meta.version))?;
    InstallReceipt::new(meta, download).save(&args.ctx.layout.keg(meta))?;
    Ok(outcome)
}

// Warn when the new link is not what `PATH` resolves the command to.
fn path_hint(meta: &PackageMetadata, outcome: &InstallOutcome) {
    let link_dir = outcome.link.parent().unwrap_or(Path::new("."));
    match which::which(&meta.name) {
        Ok(found) if same_file(&found, &outcome.link) => {}
        Ok(found) => println!(
            "Note: '{}' on PATH resolves to {}; put {} earlier in PATH to use this install",
            meta.name,
            found.display(),
            link_dir.display()
        ),
        Err(_) => println!("Note: add {} to PATH to run '{}'", link_dir.display(), meta.name),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
