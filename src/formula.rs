//! The installer descriptor: package identity plus one download source per
//! supported operating system.
//!
//! A [`Formula`] is built once (either the built-in [`Formula::xnx`] or a TOML
//! file via [`Formula::load`]) and passed by reference to everything that
//! needs it. Nothing here touches the network or the install tree.

use crate::digest::Sha256Digest;
use crate::error::{InstallError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

const XNX_CLASS: &str = "Aiurovet::Xnx";
const XNX_VERSION: &str = "0.2.0";
const XNX_DESC: &str =
    "Command-line utility for sophisticated search and replace followed by calling external executables";
const XNX_HOMEPAGE: &str = "https://aiurovet.com/applications/{name}.html";
const XNX_BASE_URL: &str = "https://github.com/aiurovet/{name}/raw/release/{version}/app/{os}/";
const XNX_LINUX_SHA256: &str = "f4556de71342b80c0233c0acff6a3ca037d321f25d33cdd61c798b1d87c723a6";
const XNX_MACOS_SHA256: &str = "2d9a8fa883a91612b7382e9d2fea381709d4666bb0c6c7e2e9596c76b53d9f7c";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OsName {
    Linux,
    MacOs,
}

impl OsName {
    /// Map a host OS identifier onto a supported variant key. Anything outside
    /// Linux/macOS is rejected rather than defaulted.
    pub fn from_host(host: &str) -> Result<Self> {
        match host.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(OsName::Linux),
            "macos" | "darwin" | "osx" => Ok(OsName::MacOs),
            _ => Err(InstallError::UnsupportedOs(host.to_string())),
        }
    }

    /// Name as it appears in release URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            OsName::Linux => "Linux",
            OsName::MacOs => "macOS",
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for OsName {
    type Error = InstallError;
    fn try_from(value: String) -> Result<Self> {
        OsName::from_host(&value)
    }
}

impl From<OsName> for String {
    fn from(value: OsName) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub version: semver::Version,
    pub license: String,
    pub homepage_template: String,
    pub description: String,
}

impl PackageMetadata {
    pub fn homepage(&self) -> String {
        render(&self.homepage_template, &self.name, &self.version.to_string(), None)
    }

    pub fn version_str(&self) -> String {
        self.version.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformVariant {
    pub os_name: OsName,
    pub archive_file_name: String,
    pub base_url: String,
    pub sha256: Sha256Digest,
}

impl PlatformVariant {
    /// Base URL followed by the archive name. No reachability check.
    pub fn build_download_url(&self) -> String {
        format!("{}{}", self.base_url, self.archive_file_name)
    }
}

/// What a single install run downloads and verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDownload {
    pub os_name: OsName,
    pub url: String,
    pub archive_file_name: String,
    pub expected_digest: Sha256Digest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formula {
    pub metadata: PackageMetadata,
    pub variants: Vec<PlatformVariant>,
}

/// Last `:`-separated segment of a namespaced identifier, lowercased
/// (`Aiurovet::Xnx` -> `xnx`).
pub fn short_name(identifier: &str) -> String {
    identifier
        .rsplit(':')
        .next()
        .unwrap_or(identifier)
        .trim()
        .to_ascii_lowercase()
}

fn render(template: &str, name: &str, version: &str, os: Option<OsName>) -> String {
    let out = template.replace("{name}", name).replace("{version}", version);
    match os {
        Some(os) => out.replace("{os}", os.as_str()),
        None => out,
    }
}

fn parse_version(version: &str) -> Result<semver::Version> {
    semver::Version::parse(version.trim()).map_err(|source| InstallError::InvalidVersion {
        version: version.to_string(),
        source,
    })
}

fn serialize_display<S: serde::Serializer, T: fmt::Display>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl Formula {
    /// The built-in xnx descriptor.
    pub fn xnx() -> Result<Self> {
        let name = short_name(XNX_CLASS);
        let version = parse_version(XNX_VERSION)?;
        let v = version.to_string();
        let variant = |os: OsName, archive: &str, sha: &str| -> Result<PlatformVariant> {
            Ok(PlatformVariant {
                os_name: os,
                archive_file_name: render(archive, &name, &v, Some(os)),
                base_url: render(XNX_BASE_URL, &name, &v, Some(os)),
                sha256: Sha256Digest::new(sha)?,
            })
        };
        let variants = vec![
            variant(OsName::Linux, "{name}-{version}-linux-amd64.tar.gz", XNX_LINUX_SHA256)?,
            variant(OsName::MacOs, "{name}-{version}-macos.tar.gz", XNX_MACOS_SHA256)?,
        ];
        let formula = Formula {
            metadata: PackageMetadata {
                name: name.clone(),
                version,
                license: "MIT".to_string(),
                homepage_template: XNX_HOMEPAGE.to_string(),
                description: XNX_DESC.to_string(),
            },
            variants,
        };
        formula.validate()?;
        Ok(formula)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs_err::read_to_string(path)?;
        Self::from_toml(&data).with_context(|| format!("loading formula {}", path.display()))
    }

    pub fn from_toml(data: &str) -> anyhow::Result<Self> {
        let file: FormulaFile = toml::from_str(data).context("parsing formula toml")?;
        Ok(file.into_formula()?)
    }

    /// Variant for an already-parsed OS. Missing variant is `UnsupportedOs`.
    pub fn variant_for(&self, os: OsName) -> Result<&PlatformVariant> {
        self.variants
            .iter()
            .find(|v| v.os_name == os)
            .ok_or_else(|| InstallError::UnsupportedOs(os.to_string()))
    }

    pub fn resolve_variant(&self, host_os: &str) -> Result<&PlatformVariant> {
        let os = OsName::from_host(host_os)?;
        let variant = self.variant_for(os)?;
        tracing::debug!(host = host_os, os = %variant.os_name, archive = %variant.archive_file_name, "resolved variant");
        Ok(variant)
    }

    pub fn resolve_download(&self, host_os: &str) -> Result<ResolvedDownload> {
        let variant = self.resolve_variant(host_os)?;
        Ok(ResolvedDownload {
            os_name: variant.os_name,
            url: variant.build_download_url(),
            archive_file_name: variant.archive_file_name.clone(),
            expected_digest: variant.sha256.clone(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        if self.metadata.name.is_empty() {
            return Err(InstallError::InvalidFormula("package name is empty".into()));
        }
        if self.variants.is_empty() {
            return Err(InstallError::InvalidFormula("no platform variants".into()));
        }
        for v in &self.variants {
            if !seen.insert(v.os_name) {
                return Err(InstallError::InvalidFormula(format!(
                    "duplicate variant for {}",
                    v.os_name
                )));
            }
            if v.archive_file_name.is_empty() {
                return Err(InstallError::InvalidFormula(format!(
                    "{} variant has no archive name",
                    v.os_name
                )));
            }
            if !v.build_download_url().ends_with(&v.archive_file_name) {
                return Err(InstallError::InvalidFormula(format!(
                    "{} url does not end with archive name",
                    v.os_name
                )));
            }
            // Re-check in case the digest was assembled without `Sha256Digest::new`.
            Sha256Digest::new(v.sha256.as_str())?;
        }
        Ok(())
    }
}

// ---------------- TOML schema ----------------

#[derive(Debug, Deserialize)]
struct FormulaFile {
    package: PackageSection,
    #[serde(default)]
    variants: Vec<VariantSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    #[serde(default)]
    name: Option<String>,
    /// Namespaced identifier used when `name` is absent (e.g. "Aiurovet::Xnx").
    #[serde(default)]
    class: Option<String>,
    version: String,
    license: String,
    #[serde(default)]
    homepage: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VariantSection {
    os: OsName,
    archive: String,
    #[serde(default)]
    base_url: Option<String>,
    sha256: String,
}

impl FormulaFile {
    fn into_formula(self) -> Result<Formula> {
        let pkg = self.package;
        let name = match (pkg.name, pkg.class) {
            (Some(n), _) => n,
            (None, Some(c)) => short_name(&c),
            (None, None) => {
                return Err(InstallError::InvalidFormula(
                    "package needs `name` or `class`".into(),
                ))
            }
        };
        let version = parse_version(&pkg.version)?;
        let v = version.to_string();
        let mut variants = Vec::with_capacity(self.variants.len());
        for section in self.variants {
            let base = section
                .base_url
                .as_deref()
                .or(pkg.base_url.as_deref())
                .ok_or_else(|| {
                    InstallError::InvalidFormula(format!("{} variant has no base_url", section.os))
                })?;
            let sha256 = Sha256Digest::new(&section.sha256).map_err(|e| {
                InstallError::InvalidFormula(format!("{} variant: {e}", section.os))
            })?;
            variants.push(PlatformVariant {
                os_name: section.os,
                archive_file_name: render(&section.archive, &name, &v, Some(section.os)),
                base_url: render(base, &name, &v, Some(section.os)),
                sha256,
            });
        }
        let formula = Formula {
            metadata: PackageMetadata {
                name,
                version,
                license: pkg.license,
                homepage_template: pkg.homepage,
                description: pkg.description,
            },
            variants,
        };
        formula.validate()?;
        Ok(formula)
    }
}
