use crate::error::{InstallError, Result};
use crate::formula::PackageMetadata;
use crate::platform::platform;
use flate2::read::GzDecoder;
use fs_err as fs;
use indicatif::ProgressBar;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};

/// Where kegs are unpacked and where the public symlink goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub cellar: PathBuf,
    pub bin: PathBuf,
}

impl Layout {
    pub fn from_prefix(prefix: &Path) -> Self {
        Self {
            cellar: prefix.join("Cellar"),
            bin: prefix.join("bin"),
        }
    }

    /// `{cellar}/{name}/{version}`
    pub fn keg(&self, meta: &PackageMetadata) -> PathBuf {
        self.cellar.join(&meta.name).join(meta.version_str())
    }

    /// `{cellar}/{name}/{version}/{name}`
    pub fn executable(&self, meta: &PackageMetadata) -> PathBuf {
        self.keg(meta).join(&meta.name)
    }

    /// `{bin}/{name}`
    pub fn link(&self, meta: &PackageMetadata) -> PathBuf {
        self.bin.join(&meta.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub executable: PathBuf,
    pub link: PathBuf,
    /// An earlier symlink at `link` was replaced.
    pub relinked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallOutcome {
    pub removed_link: bool,
    pub removed_keg: bool,
}

/// Extract a downloaded, digest-verified archive into the cellar and link the
/// executable into `bin`. Nothing is linked if extraction fails.
pub fn install(
    archive: &Path,
    layout: &Layout,
    meta: &PackageMetadata,
    pb: Option<&ProgressBar>,
) -> Result<InstallOutcome> {
    if let Some(p) = pb {
        p.set_message(format!("Extract {} {}", meta.name, meta.version));
    }
    // A re-install starts from an empty keg so files from an earlier archive don't linger.
    let keg = layout.keg(meta);
    if keg.is_dir() {
        tracing::debug!(keg = %keg.display(), "clearing existing keg");
        fs::remove_dir_all(&keg)?;
    }
    let count = extract_tar_gz(archive, &layout.cellar)?;
    tracing::info!(archive = %archive.display(), cellar = %layout.cellar.display(), entries = count, "extracted archive");
    if let Some(p) = pb {
        p.set_message(format!("Link {}", meta.name));
    }
    link_executable(layout, meta)
}

/// Link an already-extracted keg's executable into `bin`.
pub fn link_executable(layout: &Layout, meta: &PackageMetadata) -> Result<InstallOutcome> {
    let executable = layout.executable(meta);
    // Not followed: a symlinked executable could point anywhere on disk.
    match std::fs::symlink_metadata(&executable) {
        Ok(m) if m.file_type().is_file() => {}
        _ => return Err(InstallError::ExtractedPathNotFound(executable)),
    }
    platform().make_executable(&executable)?;

    let link = layout.link(meta);
    let relinked = match std::fs::symlink_metadata(&link) {
        Ok(m) if m.file_type().is_symlink() => {
            fs::remove_file(&link)?;
            true
        }
        Ok(_) => return Err(InstallError::LinkConflict(link)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };
    fs::create_dir_all(&layout.bin)?;
    platform().symlink(&executable, &link)?;
    tracing::debug!(link = %link.display(), target = %executable.display(), relinked, "linked executable");
    Ok(InstallOutcome {
        executable,
        link,
        relinked,
    })
}

/// Remove the public link (only if it points into this keg) and the keg itself.
pub fn uninstall(layout: &Layout, meta: &PackageMetadata) -> Result<UninstallOutcome> {
    let keg = layout.keg(meta);
    let link = layout.link(meta);
    let mut out = UninstallOutcome::default();

    if let Ok(target) = std::fs::read_link(&link) {
        let target = if target.is_relative() {
            link.parent().map(|p| p.join(&target)).unwrap_or(target)
        } else {
            target
        };
        if target.starts_with(&keg) {
            fs::remove_file(&link)?;
            out.removed_link = true;
        } else {
            tracing::warn!(link = %link.display(), target = %target.display(), "link points outside keg; leaving it");
        }
    }
    if keg.is_dir() {
        fs::remove_dir_all(&keg)?;
        out.removed_keg = true;
    }
    // Drop `{cellar}/{name}` once no versions remain.
    if let Some(parent) = keg.parent() {
        let empty = std::fs::read_dir(parent)
            .map(|mut it| it.next().is_none())
            .unwrap_or(false);
        if empty {
            fs::remove_dir(parent)?;
        }
    }
    Ok(out)
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<usize> {
    let wrap = |source: std::io::Error| InstallError::Extract {
        archive: archive.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(archive).map_err(wrap)?;
    fs::create_dir_all(dest)?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));
    tar.set_preserve_permissions(true);
    let mut count = 0usize;
    for entry in tar.entries().map_err(wrap)? {
        let mut entry = entry.map_err(wrap)?;
        let rel = entry.path().map_err(wrap)?.into_owned();
        if !is_safe_relative(&rel) {
            return Err(InstallError::UnsafeArchiveEntry(rel));
        }
        if matches!(entry.header().entry_type(), EntryType::Symlink | EntryType::Link) {
            let target = entry.link_name().map_err(wrap)?.map(|t| t.into_owned());
            match target {
                Some(t) if is_safe_relative(&t) => {}
                _ => return Err(InstallError::UnsafeArchiveEntry(rel)),
            }
        }
        if !entry.unpack_in(dest).map_err(wrap)? {
            return Err(InstallError::UnsafeArchiveEntry(rel));
        }
        count += 1;
    }
    Ok(count)
}

fn is_safe_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
