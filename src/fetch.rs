use crate::digest::{sha256_file, verify_file};
use crate::error::{InstallError, Result};
use crate::formula::ResolvedDownload;
use fs_err as fs;
use indicatif::ProgressBar;
use reqwest::blocking::Client;
use std::io::Read;
use std::path::{Path, PathBuf};

pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("xnx-install")
}

pub fn cached_path(cache_dir: &Path, download: &ResolvedDownload) -> PathBuf {
    cache_dir.join(&download.archive_file_name)
}

/// Return a local archive whose digest matches `download.expected_digest`,
/// downloading it into `cache_dir` unless a valid copy is already there.
pub fn fetch(
    client: &Client,
    download: &ResolvedDownload,
    cache_dir: &Path,
    pb: Option<&ProgressBar>,
) -> Result<PathBuf> {
    let dest = cached_path(cache_dir, download);
    if dest.is_file() {
        match sha256_file(&dest) {
            Ok(d) if d == download.expected_digest => {
                tracing::info!(path = %dest.display(), "using cached download");
                return Ok(dest);
            }
            _ => {
                tracing::warn!(path = %dest.display(), "cached download is stale; fetching again");
                fs::remove_file(&dest)?;
            }
        }
    }
    fs::create_dir_all(cache_dir)?;

    if let Some(p) = pb {
        p.set_message(format!("GET {}", download.archive_file_name));
    }
    tracing::info!(url = %download.url, "downloading");
    let resp = client
        .get(&download.url)
        .header(
            reqwest::header::USER_AGENT,
            concat!("xnx-install/", env!("CARGO_PKG_VERSION")),
        )
        .send()?;
    if !resp.status().is_success() {
        return Err(InstallError::Download {
            url: download.url.clone(),
            status: resp.status().to_string(),
        });
    }

    let part = dest.with_extension("part");
    write_part(&part, resp)?;
    store_verified(&part, &dest, download)?;
    Ok(dest)
}

/// Stream `body` into `part`; a partially written file is deleted on error.
fn write_part<R: Read>(part: &Path, mut body: R) -> Result<()> {
    let copied = fs::File::create(part).and_then(|mut out| std::io::copy(&mut body, &mut out));
    if let Err(e) = copied {
        let _ = fs::remove_file(part);
        return Err(e.into());
    }
    Ok(())
}

/// Verify `part` and move it to `dest`; a mismatching file is deleted.
fn store_verified(part: &Path, dest: &Path, download: &ResolvedDownload) -> Result<()> {
    if let Err(e) = verify_file(part, &download.expected_digest) {
        let _ = fs::remove_file(part);
        return Err(e);
    }
    fs::rename(part, dest)?;
    Ok(())
}
