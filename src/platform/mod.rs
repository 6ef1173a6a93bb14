pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

use crate::error::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub trait PlatformOps: Sync + Send {
    /// Host OS identifier fed to `Formula::resolve_variant`.
    fn host_os(&self) -> &'static str;
    /// Package-manager prefix used when neither `--prefix` nor `HOMEBREW_PREFIX` is set.
    fn default_prefix(&self) -> PathBuf;
    fn make_executable(&self, path: &Path) -> Result<()>;
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;
}

/// `--prefix` wins, then `HOMEBREW_PREFIX`, then the platform default.
pub fn resolve_prefix(explicit: Option<&Path>) -> PathBuf {
    choose_prefix(explicit, std::env::var_os("HOMEBREW_PREFIX"))
}

fn choose_prefix(explicit: Option<&Path>, env_prefix: Option<OsString>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match env_prefix {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => platform().default_prefix(),
    }
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_prefix_wins() {
        let p = resolve_prefix(Some(Path::new("/tmp/brew")));
        assert_eq!(p, PathBuf::from("/tmp/brew"));
        let p = choose_prefix(Some(Path::new("/tmp/brew")), Some("/env/brew".into()));
        assert_eq!(p, PathBuf::from("/tmp/brew"));
    }

    #[test]
    fn env_prefix_beats_default() {
        let p = choose_prefix(None, Some("/env/brew".into()));
        assert_eq!(p, PathBuf::from("/env/brew"));
    }

    #[test]
    fn empty_or_missing_env_falls_back_to_default() {
        let default = platform().default_prefix();
        assert_eq!(choose_prefix(None, Some(OsString::new())), default);
        assert_eq!(choose_prefix(None, None), default);
    }

    #[cfg(unix)]
    #[test]
    fn host_os_is_supported_on_unix_targets() {
        let host = platform().host_os();
        if cfg!(any(target_os = "linux", target_os = "macos")) {
            assert!(crate::formula::OsName::from_host(host).is_ok(), "{host}");
        }
    }
}
