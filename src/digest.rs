use crate::error::{InstallError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// A sha256 content digest, always exactly 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    pub fn new(s: &str) -> Result<Self> {
        let hex = s.trim();
        if hex.len() != 64 {
            return Err(InstallError::InvalidDigest {
                value: s.to_string(),
                reason: format!("expected 64 hex characters, got {}", hex.len()),
            });
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InstallError::InvalidDigest {
                value: s.to_string(),
                reason: "contains non-hex characters".to_string(),
            });
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Sha256Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Sha256Digest::new(&s).map_err(serde::de::Error::custom)
    }
}

pub fn sha256_reader<R: Read>(mut reader: R) -> Result<Sha256Digest> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Sha256Digest(hex::encode(hasher.finalize())))
}

pub fn sha256_file(path: &Path) -> Result<Sha256Digest> {
    let file = fs_err::File::open(path)?;
    sha256_reader(file)
}

/// Hash `path` and compare against `expected`.
pub fn verify_file(path: &Path, expected: &Sha256Digest) -> Result<()> {
    let actual = sha256_file(path)?;
    if &actual != expected {
        return Err(InstallError::DigestMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    tracing::debug!(path = %path.display(), digest = %actual, "checksum verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("abc")
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn accepts_64_hex_and_lowercases() {
        let d = Sha256Digest::new(&ABC.to_ascii_uppercase()).unwrap();
        assert_eq!(d.as_str(), ABC);
    }

    #[test]
    fn rejects_wrong_length() {
        let long = format!("{ABC}0");
        let err = Sha256Digest::new(&long).unwrap_err();
        assert!(matches!(err, InstallError::InvalidDigest { .. }));
        assert!(err.to_string().contains("got 65"));
        assert!(Sha256Digest::new(&ABC[..63]).is_err());
    }

    #[test]
    fn rejects_non_hex() {
        let bad = format!("{}zz", &ABC[..62]);
        assert!(Sha256Digest::new(&bad).is_err());
    }

    #[test]
    fn hashes_reader() {
        let d = sha256_reader(&b"abc"[..]).unwrap();
        assert_eq!(d.as_str(), ABC);
    }

    #[test]
    fn verify_file_reports_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"abc").unwrap();
        verify_file(&path, &Sha256Digest::new(ABC).unwrap()).unwrap();

        std::fs::write(&path, b"abd").unwrap();
        match verify_file(&path, &Sha256Digest::new(ABC).unwrap()) {
            Err(InstallError::DigestMismatch { expected, actual }) => {
                assert_eq!(expected, ABC);
                assert_ne!(actual, ABC);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_validates() {
        #[derive(Deserialize)]
        struct Wrap {
            sha256: Sha256Digest,
        }
        let ok: Wrap = toml::from_str(&format!("sha256 = \"{ABC}\"")).unwrap();
        assert_eq!(ok.sha256.as_str(), ABC);
        assert!(toml::from_str::<Wrap>("sha256 = \"abc\"").is_err());
    }
}
