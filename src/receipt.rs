use crate::error::Result;
use crate::formula::{PackageMetadata, ResolvedDownload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const RECEIPT_FILE: &str = "INSTALL_RECEIPT.json";

/// Record of one install, written into the keg.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstallReceipt {
    pub name: String,
    pub version: String,
    pub os: String,
    pub source_url: String,
    pub sha256: String,
    pub installed_at: DateTime<Utc>,
    pub installer_version: String,
}

impl InstallReceipt {
    pub fn new(meta: &PackageMetadata, download: &ResolvedDownload) -> Self {
        Self {
            name: meta.name.clone(),
            version: meta.version_str(),
            os: download.os_name.to_string(),
            source_url: download.url.clone(),
            sha256: download.expected_digest.to_string(),
            installed_at: Utc::now(),
            installer_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn save(&self, keg: &Path) -> Result<PathBuf> {
        let path = keg.join(RECEIPT_FILE);
        let data = serde_json::to_vec_pretty(self).map_err(std::io::Error::from)?;
        fs_err::write(&path, data)?;
        Ok(path)
    }

    pub fn load(keg: &Path) -> Result<Option<Self>> {
        let path = keg.join(RECEIPT_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs_err::read(&path)?;
        let receipt = serde_json::from_slice(&data).map_err(std::io::Error::from)?;
        Ok(Some(receipt))
    }
}
