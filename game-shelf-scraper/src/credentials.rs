use std::path::{Path, PathBuf};

use crate::error::ScrapeError;

const DEFAULT_SOFT_NAME: &str = "game-shelf";

/// ScreenScraper developer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenScraperCredentials {
    pub dev_id: String,
    pub dev_password: String,
    pub soft_name: String,
}

/// IGDB (Twitch) application credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgdbCredentials {
    pub client_id: String,
    pub token: String,
}

/// API keys for the catalogs that need one. Steam and GOG are queried
/// without credentials; a catalog whose credentials are missing is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub steam_api_key: Option<String>,
    pub rawg_api_key: Option<String>,
    pub screenscraper: Option<ScreenScraperCredentials>,
    pub igdb: Option<IgdbCredentials>,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field, in display order.
#[derive(Debug)]
pub struct CredentialSources {
    pub fields: Vec<(&'static str, CredentialSource)>,
}

impl CredentialSources {
    pub fn get(&self, field: &str) -> Option<&CredentialSource> {
        self.fields.iter().find(|(f, _)| *f == field).map(|(_, s)| s)
    }
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct CredentialsFile {
    #[serde(default)]
    pub steam: SteamSection,
    #[serde(default)]
    pub rawg: RawgSection,
    #[serde(default)]
    pub screenscraper: ScreenScraperSection,
    #[serde(default)]
    pub igdb: IgdbSection,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct SteamSection {
    pub api_key: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct RawgSection {
    pub api_key: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ScreenScraperSection {
    pub dev_id: Option<String>,
    pub dev_password: Option<String>,
    pub soft_name: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct IgdbSection {
    pub client_id: Option<String>,
    pub token: Option<String>,
}

/// One credential field: its environment variable and where it lives in
/// the config file.
struct Field {
    name: &'static str,
    env: &'static str,
    from_file: fn(&CredentialsFile) -> Option<&String>,
    default: Option<&'static str>,
}

const FIELDS: &[Field] = &[
    Field {
        name: "steam.api_key",
        env: "STEAM_API_KEY",
        from_file: |f| f.steam.api_key.as_ref(),
        default: None,
    },
    Field {
        name: "rawg.api_key",
        env: "RAWG_API_KEY",
        from_file: |f| f.rawg.api_key.as_ref(),
        default: None,
    },
    Field {
        name: "screenscraper.dev_id",
        env: "SCREENSCRAPER_DEVID",
        from_file: |f| f.screenscraper.dev_id.as_ref(),
        default: None,
    },
    Field {
        name: "screenscraper.dev_password",
        env: "SCREENSCRAPER_DEVPASSWORD",
        from_file: |f| f.screenscraper.dev_password.as_ref(),
        default: None,
    },
    Field {
        name: "screenscraper.soft_name",
        env: "SCREENSCRAPER_SOFTNAME",
        from_file: |f| f.screenscraper.soft_name.as_ref(),
        default: Some(DEFAULT_SOFT_NAME),
    },
    Field {
        name: "igdb.client_id",
        env: "IGDB_CLIENT_ID",
        from_file: |f| f.igdb.client_id.as_ref(),
        default: None,
    },
    Field {
        name: "igdb.token",
        env: "IGDB_TOKEN",
        from_file: |f| f.igdb.token.as_ref(),
        default: None,
    },
];

/// Resolves fields with priority env var > config file > default.
struct Resolver<'a, E> {
    env: E,
    file: &'a CredentialsFile,
}

impl<E: Fn(&str) -> Option<String>> Resolver<'_, E> {
    fn field(&self, name: &str) -> Option<&'static Field> {
        FIELDS.iter().find(|f| f.name == name)
    }

    fn value(&self, name: &str) -> Option<String> {
        let field = self.field(name)?;
        (self.env)(field.env)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| (field.from_file)(self.file).cloned())
            .or_else(|| field.default.map(str::to_string))
    }

    fn source(&self, field: &Field) -> CredentialSource {
        if (self.env)(field.env).is_some_and(|v| !v.trim().is_empty()) {
            CredentialSource::EnvVar(field.env)
        } else if (field.from_file)(self.file).is_some() {
            CredentialSource::ConfigFile
        } else if field.default.is_some() {
            CredentialSource::Default
        } else {
            CredentialSource::Missing
        }
    }

    fn credentials(&self) -> Credentials {
        let screenscraper = match (
            self.value("screenscraper.dev_id"),
            self.value("screenscraper.dev_password"),
        ) {
            (Some(dev_id), Some(dev_password)) => Some(ScreenScraperCredentials {
                dev_id,
                dev_password,
                soft_name: self
                    .value("screenscraper.soft_name")
                    .unwrap_or_else(|| DEFAULT_SOFT_NAME.to_string()),
            }),
            _ => None,
        };
        let igdb = match (self.value("igdb.client_id"), self.value("igdb.token")) {
            (Some(client_id), Some(token)) => Some(IgdbCredentials { client_id, token }),
            _ => None,
        };

        Credentials {
            steam_api_key: self.value("steam.api_key"),
            rawg_api_key: self.value("rawg.api_key"),
            screenscraper,
            igdb,
        }
    }
}

impl Credentials {
    /// Load credentials from environment variables and the config file.
    ///
    /// Priority: env vars > config file. A missing or unreadable config file
    /// is treated as empty.
    pub fn load() -> Self {
        let file = config_path()
            .and_then(|p| load_config_file(&p).ok())
            .unwrap_or_default();
        Self::resolve(|var| std::env::var(var).ok(), &file)
    }

    /// Resolve credentials from an explicit environment lookup and file.
    pub fn resolve(env: impl Fn(&str) -> Option<String>, file: &CredentialsFile) -> Self {
        Resolver { env, file }.credentials()
    }

    /// Resolved value of a dotted field name such as `rawg.api_key`.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        let ss = self.screenscraper.as_ref();
        let igdb = self.igdb.as_ref();
        match name {
            "steam.api_key" => self.steam_api_key.as_deref(),
            "rawg.api_key" => self.rawg_api_key.as_deref(),
            "screenscraper.dev_id" => ss.map(|c| c.dev_id.as_str()),
            "screenscraper.dev_password" => ss.map(|c| c.dev_password.as_str()),
            "screenscraper.soft_name" => ss.map(|c| c.soft_name.as_str()),
            "igdb.client_id" => igdb.map(|c| c.client_id.as_str()),
            "igdb.token" => igdb.map(|c| c.token.as_str()),
            _ => None,
        }
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("game-shelf").join("credentials.toml"))
}

/// Parse a credentials file. A missing file is empty.
pub fn load_config_file(path: &Path) -> Result<CredentialsFile, ScrapeError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CredentialsFile::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&content)
        .map_err(|e| ScrapeError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let file = config_path()
        .and_then(|p| load_config_file(&p).ok())
        .unwrap_or_default();
    sources_with(|var| std::env::var(var).ok(), &file)
}

pub fn sources_with(env: impl Fn(&str) -> Option<String>, file: &CredentialsFile) -> CredentialSources {
    let resolver = Resolver { env, file };
    CredentialSources {
        fields: FIELDS.iter().map(|f| (f.name, resolver.source(f))).collect(),
    }
}
