use crate::error::Result;
use crate::platform::PlatformOps;
use std::path::{Path, PathBuf};

pub static UNIX_PLATFORM: Unix = Unix;

pub struct Unix;

impl PlatformOps for Unix {
    fn host_os(&self) -> &'static str {
        std::env::consts::OS
    }
    fn default_prefix(&self) -> PathBuf {
        match (std::env::consts::OS, std::env::consts::ARCH) {
            ("macos", "aarch64") => PathBuf::from("/opt/homebrew"),
            ("macos", _) => PathBuf::from("/usr/local"),
            _ => PathBuf::from("/home/linuxbrew/.linuxbrew"),
        }
    }
    fn make_executable(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs_err::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        fs_err::set_permissions(path, perms)?;
        Ok(())
    }
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        fs_err::os::unix::fs::symlink(target, link)?;
        Ok(())
    }
}
