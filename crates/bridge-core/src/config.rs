use crate::error::{BridgeError, Result};
use crate::range::SheetRange;
use std::fmt;
use std::time::Duration;

pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";
pub const ENV_SHEETS_TOKEN: &str = "GOOGLE_SHEETS_TOKEN";
pub const ENV_SHEET_RANGE: &str = "GOOGLE_SHEET_RANGE";
pub const ENV_SHEETS_API_URL: &str = "GOOGLE_SHEETS_API_URL";
pub const ENV_ISSUE_API_URL: &str = "GITHUB_ISSUE_API_URL";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_OWNER: &str = "GITHUB_OWNER";
pub const ENV_GITHUB_REPO: &str = "GITHUB_REPO";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_PORT: &str = "PORT";

pub const DEFAULT_SHEET_RANGE: &str = "Sheet1!A2:H";
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 3000;

/// Reported in place of the two alternative tracker settings when neither is set.
const TRACKER_ENDPOINT_KEYS: &str = "GITHUB_ISSUE_API_URL or GITHUB_TOKEN";

// ---------------------------------------------------------------------------
// SheetsConfig
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub access_token: String,
    pub range: SheetRange,
    pub api_url: String,
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"<redacted>")
            .field("range", &self.range)
            .field("api_url", &self.api_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

/// Owner/repository pair every issue is filed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// How issues are created.
#[derive(Clone)]
pub enum TrackerEndpoint {
    /// An issue-creation relay that takes `{owner, repo, title, body}`.
    Relay { url: String },
    /// The GitHub REST API, authenticated with a token.
    GithubRest { api_url: String, token: String },
}

impl fmt::Debug for TrackerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerEndpoint::Relay { url } => f.debug_struct("Relay").field("url", url).finish(),
            TrackerEndpoint::GithubRest { api_url, .. } => f
                .debug_struct("GithubRest")
                .field("api_url", api_url)
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub endpoint: TrackerEndpoint,
    pub repo: RepoCoordinates,
}

// ---------------------------------------------------------------------------
// BridgeConfig
// ---------------------------------------------------------------------------

/// Everything the bridge needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub sheets: SheetsConfig,
    pub tracker: TrackerConfig,
    pub http_timeout: Duration,
    pub port: u16,
}

impl BridgeConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Listen port from `PORT`, resolved on its own so a server missing other
    /// settings still binds where the platform expects it.
    pub fn listen_port_from_env() -> Result<u16> {
        Self::listen_port_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn listen_port_from_lookup<F>(lookup: F) -> Result<u16>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_PORT).map(|v| v.trim().to_string()) {
            Some(raw) if !raw.is_empty() => {
                raw.parse::<u16>()
                    .map_err(|e| BridgeError::InvalidConfiguration {
                        key: ENV_PORT,
                        reason: format!("'{raw}': {e}"),
                    })
            }
            _ => Ok(DEFAULT_PORT),
        }
    }

    /// Resolve configuration through `lookup`, which returns the raw value for
    /// an environment key. Blank values count as absent.
    ///
    /// Every missing required key is reported in a single
    /// [`BridgeError::ConfigurationMissing`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            let value = get(key);
            if value.is_none() {
                missing.push(key);
            }
            value
        };

        let spreadsheet_id = required(ENV_SHEET_ID);
        let access_token = required(ENV_SHEETS_TOKEN);
        let owner = required(ENV_GITHUB_OWNER);
        let repo = required(ENV_GITHUB_REPO);

        let endpoint = match (get(ENV_ISSUE_API_URL), get(ENV_GITHUB_TOKEN)) {
            (Some(url), _) => Some(TrackerEndpoint::Relay { url }),
            (None, Some(token)) => Some(TrackerEndpoint::GithubRest {
                api_url: get(ENV_GITHUB_API_URL)
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                token,
            }),
            (None, None) => {
                missing.push(TRACKER_ENDPOINT_KEYS);
                None
            }
        };

        let (Some(spreadsheet_id), Some(access_token), Some(owner), Some(repo), Some(endpoint)) =
            (spreadsheet_id, access_token, owner, repo, endpoint)
        else {
            return Err(BridgeError::ConfigurationMissing(missing));
        };

        let range = SheetRange::parse(
            get(ENV_SHEET_RANGE)
                .as_deref()
                .unwrap_or(DEFAULT_SHEET_RANGE),
        )?;

        let http_timeout = match get(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BridgeError::InvalidConfiguration {
                        key: ENV_HTTP_TIMEOUT_SECS,
                        reason: format!("'{raw}' is not a positive number of seconds"),
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let port = Self::listen_port_from_lookup(&lookup)?;

        Ok(Self {
            sheets: SheetsConfig {
                spreadsheet_id,
                access_token,
                range,
                api_url: get(ENV_SHEETS_API_URL)
                    .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string()),
            },
            tracker: TrackerConfig {
                endpoint,
                repo: RepoCoordinates { owner, repo },
            },
            http_timeout,
            port,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const COMPLETE: &[(&str, &str)] = &[
        (ENV_SHEET_ID, "sheet-123"),
        (ENV_SHEETS_TOKEN, "ya29.token"),
        (ENV_ISSUE_API_URL, "https://relay.example/issues"),
        (ENV_GITHUB_OWNER, "acme"),
        (ENV_GITHUB_REPO, "widgets"),
    ];

    #[test]
    fn complete_environment_uses_defaults() {
        let config = BridgeConfig::from_lookup(lookup(COMPLETE)).unwrap();
        assert_eq!(config.sheets.spreadsheet_id, "sheet-123");
        assert_eq!(config.sheets.range.as_str(), DEFAULT_SHEET_RANGE);
        assert_eq!(config.sheets.api_url, DEFAULT_SHEETS_API_URL);
        assert_eq!(config.tracker.repo.to_string(), "acme/widgets");
        assert!(matches!(
            config.tracker.endpoint,
            TrackerEndpoint::Relay { ref url } if url == "https://relay.example/issues"
        ));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn every_missing_key_is_reported_at_once() {
        let err = BridgeConfig::from_lookup(lookup(&[(ENV_GITHUB_REPO, "widgets")])).unwrap_err();
        match err {
            BridgeError::ConfigurationMissing(keys) => assert_eq!(
                keys,
                vec![
                    ENV_SHEET_ID,
                    ENV_SHEETS_TOKEN,
                    ENV_GITHUB_OWNER,
                    TRACKER_ENDPOINT_KEYS
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut pairs = COMPLETE.to_vec();
        pairs[0] = (ENV_SHEET_ID, "   ");
        let err = BridgeConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required configuration: GOOGLE_SHEET_ID"
        );
    }

    #[test]
    fn token_selects_github_rest() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (ENV_SHEET_ID, "sheet-123"),
            (ENV_SHEETS_TOKEN, "ya29.token"),
            (ENV_GITHUB_TOKEN, "ghp_secret"),
            (ENV_GITHUB_OWNER, "acme"),
            (ENV_GITHUB_REPO, "widgets"),
        ]))
        .unwrap();
        match &config.tracker.endpoint {
            TrackerEndpoint::GithubRest { api_url, token } => {
                assert_eq!(api_url, DEFAULT_GITHUB_API_URL);
                assert_eq!(token, "ghp_secret");
            }
            other => panic!("unexpected endpoint: {other:?}"),
        }
    }

    #[test]
    fn relay_wins_when_both_are_set() {
        let mut pairs = COMPLETE.to_vec();
        pairs.push((ENV_GITHUB_TOKEN, "ghp_secret"));
        let config = BridgeConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(matches!(
            config.tracker.endpoint,
            TrackerEndpoint::Relay { .. }
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut pairs = COMPLETE.to_vec();
        pairs.retain(|(k, _)| *k != ENV_ISSUE_API_URL);
        pairs.push((ENV_GITHUB_TOKEN, "ghp_secret"));
        let config = BridgeConfig::from_lookup(lookup(&pairs)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ya29.token"));
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn invalid_port_and_timeout_are_rejected() {
        let mut pairs = COMPLETE.to_vec();
        pairs.push((ENV_PORT, "http"));
        let err = BridgeConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("PORT"), "{err}");

        let mut pairs = COMPLETE.to_vec();
        pairs.push((ENV_HTTP_TIMEOUT_SECS, "0"));
        let err = BridgeConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"), "{err}");
    }

    #[test]
    fn port_resolves_without_the_required_keys() {
        let only_port = lookup(&[(ENV_PORT, "8080")]);
        assert!(BridgeConfig::from_lookup(&only_port).is_err());
        assert_eq!(BridgeConfig::listen_port_from_lookup(&only_port).unwrap(), 8080);

        assert_eq!(
            BridgeConfig::listen_port_from_lookup(lookup(&[])).unwrap(),
            DEFAULT_PORT
        );
        assert_eq!(
            BridgeConfig::listen_port_from_lookup(lookup(&[(ENV_PORT, " ")])).unwrap(),
            DEFAULT_PORT
        );
        assert!(BridgeConfig::listen_port_from_lookup(lookup(&[(ENV_PORT, "70000")])).is_err());
    }

    #[test]
    fn custom_range_is_parsed() {
        let mut pairs = COMPLETE.to_vec();
        pairs.push((ENV_SHEET_RANGE, "Tickets!A10:H"));
        let config = BridgeConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.sheets.range.first_row(), 10);
    }
}
