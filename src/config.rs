//! Sealer configuration.
//!
//! Settings come from three layers, lowest priority first: built-in
//! defaults, a JSON config file, and command-line flags / environment.

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::{KdfParams, SALT_LEN};
use crate::format::{LEGACY_SALT, SaltMode};

/// Immutable settings shared by every seal/open call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    kdf: KdfParams,
    salt_mode: SaltMode,
}

impl Config {
    pub fn new(kdf: KdfParams, salt_mode: SaltMode) -> Self {
        Self { kdf, salt_mode }
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    pub fn salt_mode(&self) -> SaltMode {
        self.salt_mode
    }

    /// Builds a config from a settings layer, falling back to defaults.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let kdf = match settings.iterations {
            Some(n) => KdfParams::new(n).context("invalid iteration count")?,
            None => KdfParams::default(),
        };

        let salt_mode = match (&settings.shared_salt, settings.legacy_salt) {
            (Some(_), Some(true)) => bail!("shared_salt and legacy_salt are mutually exclusive"),
            (Some(salt), _) => SaltMode::Shared(parse_salt_hex(salt)?),
            (None, Some(true)) => SaltMode::Shared(LEGACY_SALT),
            (None, _) => SaltMode::Embedded,
        };

        Ok(Self::new(kdf, salt_mode))
    }

    /// Loads settings from `path` (or the default location) and applies
    /// `overrides` on top.
    ///
    /// An explicit path must exist; a missing default file is not an error.
    pub fn load(path: Option<&Path>, overrides: Settings) -> Result<Self> {
        let file = match path {
            Some(p) => Settings::read(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Settings::read(&p)?,
                _ => Settings::default(),
            },
        };

        Self::from_settings(&file.merge(overrides))
    }
}

/// One layer of optional settings, as stored in the JSON config file.
///
/// ```json
/// { "iterations": 100000, "shared_salt": "000102030405060708090a0b0c0d0e0f" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub iterations: Option<u32>,
    pub shared_salt: Option<String>,
    pub legacy_salt: Option<bool>,
}

impl Settings {
    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Overlays `other` on `self`; fields set in `other` win.
    ///
    /// Choosing a salt source in `other` replaces both salt fields of `self`.
    pub fn merge(self, other: Settings) -> Settings {
        let salt_overridden = other.shared_salt.is_some() || other.legacy_salt.is_some();
        Settings {
            iterations: other.iterations.or(self.iterations),
            shared_salt: if salt_overridden {
                other.shared_salt
            } else {
                self.shared_salt
            },
            legacy_salt: if salt_overridden {
                other.legacy_salt
            } else {
                self.legacy_salt
            },
        }
    }
}

/// Parses a 32-character hex string into a salt.
pub fn parse_salt_hex(s: &str) -> Result<[u8; SALT_LEN]> {
    let bytes = hex::decode(s.trim()).context("shared salt is not valid hex")?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("shared salt must be {SALT_LEN} bytes, got {}", bytes.len()))
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pwseal").map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_embed_salt_with_100k_iterations() {
        let cfg = Config::from_settings(&Settings::default()).unwrap();
        assert_eq!(cfg.kdf().iterations(), 100_000);
        assert_eq!(cfg.salt_mode(), SaltMode::Embedded);
    }

    #[test]
    fn legacy_salt_selects_original_constant() {
        let cfg = Config::from_settings(&Settings {
            legacy_salt: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.salt_mode(), SaltMode::Shared(LEGACY_SALT));
    }

    #[test]
    fn shared_salt_is_parsed_from_hex() {
        let cfg = Config::from_settings(&Settings {
            shared_salt: Some("ff".repeat(16)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.salt_mode(), SaltMode::Shared([0xff; SALT_LEN]));
    }

    #[test]
    fn conflicting_salt_sources_fail() {
        let res = Config::from_settings(&Settings {
            shared_salt: Some("00".repeat(16)),
            legacy_salt: Some(true),
            ..Default::default()
        });
        assert!(res.is_err());
    }

    #[test]
    fn bad_salt_hex_fails() {
        assert!(parse_salt_hex("zz").is_err());
        assert!(parse_salt_hex(&"00".repeat(15)).is_err());
        assert!(parse_salt_hex(&"00".repeat(17)).is_err());
        assert_eq!(
            parse_salt_hex(" 000102030405060708090a0b0c0d0e0f\n").unwrap(),
            LEGACY_SALT
        );
    }

    #[test]
    fn low_iterations_fail() {
        let res = Config::from_settings(&Settings {
            iterations: Some(10),
            ..Default::default()
        });
        assert!(res.is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let file = Settings {
            iterations: Some(5_000),
            shared_salt: Some("11".repeat(16)),
            legacy_salt: None,
        };
        let cli = Settings {
            iterations: Some(2_000),
            legacy_salt: Some(true),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.iterations, Some(2_000));
        assert_eq!(merged.shared_salt, None);
        assert_eq!(merged.legacy_salt, Some(true));
    }

    #[test]
    fn file_values_survive_empty_overrides() {
        let file = Settings {
            iterations: Some(5_000),
            shared_salt: Some("11".repeat(16)),
            legacy_salt: None,
        };
        assert_eq!(file.clone().merge(Settings::default()), file);
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "iterations": 2000, "legacy_salt": true }"#).unwrap();

        let cfg = Config::load(Some(&path), Settings::default()).unwrap();
        assert_eq!(cfg.kdf().iterations(), 2_000);
        assert_eq!(cfg.salt_mode(), SaltMode::Shared(LEGACY_SALT));
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "iterationz": 2000 }"#).unwrap();

        assert!(Config::load(Some(&path), Settings::default()).is_err());
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(Config::load(Some(&path), Settings::default()).is_err());
    }
}
