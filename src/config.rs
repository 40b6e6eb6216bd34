//! Credential resolution and the on-disk config file.
//!
//! The token is looked up, in order, in:
//! 1. `~/.x-cli.json` (`{"token": "...", "defaultFormat": "table"}`)
//! 2. `~/my/x-token.txt` (legacy plain-text layout)
//!
//! Nothing is cached; every call reads the files again.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::format::OutputFormat;

pub const CONFIG_FILE: &str = ".x-cli.json";
pub const LEGACY_TOKEN_DIR: &str = "my";
pub const LEGACY_TOKEN_FILE: &str = "x-token.txt";

/// Locations searched for the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    pub config_file: PathBuf,
    pub legacy_token_file: PathBuf,
}

impl CredentialPaths {
    pub fn from_home(home: &Path) -> Self {
        Self {
            config_file: home.join(CONFIG_FILE),
            legacy_token_file: home.join(LEGACY_TOKEN_DIR).join(LEGACY_TOKEN_FILE),
        }
    }

    /// Paths under the current user's home directory.
    pub fn discover() -> ConfigResult<Self> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::from_home(&home))
    }
}

/// Contents of `~/.x-cli.json`.
///
/// Keys this tool does not know about are kept so rewriting the file does
/// not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Unrecognised values load as `None` so they never hide the token.
    #[serde(
        default,
        deserialize_with = "lenient_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_format: Option<OutputFormat>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file, or an empty config when it does not exist yet.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut body = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        body.push('\n');
        write_private(path, body.as_bytes()).map_err(io_err)
    }

    fn credential(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

fn lenient_format<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OutputFormat>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.and_then(|value| {
        let parsed = value
            .as_str()
            .and_then(|s| serde_json::from_value(Value::from(s.to_ascii_lowercase())).ok());
        if parsed.is_none() {
            warn!(%value, "Ignoring unrecognised defaultFormat in config file");
        }
        parsed
    }))
}

/// Write `body` to a file only the owner can read, creating it that way.
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; an existing file is tightened before the write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(body)
}

/// Where a credential was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    ConfigFile(PathBuf),
    LegacyTokenFile(PathBuf),
}

impl CredentialSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::ConfigFile(p) | Self::LegacyTokenFile(p) => p,
        }
    }
}

/// A resolved access token plus the preferences stored next to it.
#[derive(Clone, PartialEq)]
pub struct Credential {
    pub token: String,
    pub default_format: Option<OutputFormat>,
    pub source: CredentialSource,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &mask_token(&self.token))
            .field("default_format", &self.default_format)
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the token from the first source that yields a non-empty value.
///
/// A primary file that exists but cannot be read or parsed is skipped with a
/// warning rather than failing the lookup.
pub fn resolve_credential(paths: &CredentialPaths) -> ConfigResult<Credential> {
    if paths.config_file.exists() {
        match ConfigFile::load(&paths.config_file) {
            Ok(config) => {
                if let Some(token) = config.credential() {
                    debug!(path = %paths.config_file.display(), "Using token from config file");
                    return Ok(Credential {
                        token: token.to_string(),
                        default_format: config.default_format,
                        source: CredentialSource::ConfigFile(paths.config_file.clone()),
                    });
                }
            }
            Err(e) => warn!("Failed to parse config file: {e}"),
        }
    }

    if paths.legacy_token_file.exists() {
        match fs::read_to_string(&paths.legacy_token_file) {
            Ok(raw) => {
                let token = raw.trim();
                if !token.is_empty() {
                    debug!(path = %paths.legacy_token_file.display(), "Using legacy token file");
                    return Ok(Credential {
                        token: token.to_string(),
                        default_format: None,
                        source: CredentialSource::LegacyTokenFile(
                            paths.legacy_token_file.clone(),
                        ),
                    });
                }
            }
            Err(e) => warn!(
                "Failed to read token file {}: {e}",
                paths.legacy_token_file.display()
            ),
        }
    }

    Err(ConfigError::MissingCredential {
        config_file: paths.config_file.clone(),
        legacy_token_file: paths.legacy_token_file.clone(),
    })
}

/// Show only the edges of a token, e.g. `AAAA…wxyz`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
