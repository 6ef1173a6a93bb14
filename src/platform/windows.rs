use crate::error::{InstallError, Result};
use crate::platform::PlatformOps;
use std::path::{Path, PathBuf};

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

// Builds, but `resolve_variant` rejects the host before any of this is reached.
impl PlatformOps for Windows {
    fn host_os(&self) -> &'static str { std::env::consts::OS }
    fn default_prefix(&self) -> PathBuf { std::env::var_os("USERPROFILE").map(PathBuf::from).unwrap_or_default().join(".xnx") }
    fn make_executable(&self, _path: &Path) -> Result<()> { Ok(()) }
    fn symlink(&self, _target: &Path, _link: &Path) -> Result<()> { Err(InstallError::SymlinkUnsupported) }
}
