//! HTTP client for the cooperative's remote document store.
//!
//! Collections live under an environment prefix:
//! `{base_url}/{environment}/{collection}`. The `syncTimestamps` document maps
//! collection names to their last-modified time in epoch milliseconds.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::RemoteError;
use crate::config::RemoteConfig;
use crate::models::{Measure, OrderLine, TableKey};
use crate::sync::{RemoteTimestampSource, SyncError, TimestampMap};

const TIMESTAMPS_DOCUMENT: &str = "syncTimestamps";

/// Deployment the remote paths are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Develop,
    Production,
}

impl Environment {
    pub fn path(self) -> &'static str {
        match self {
            Environment::Develop => "develop",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "develop" | "dev" => Ok(Environment::Develop),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment '{}'. Valid options: develop, production",
                s
            )),
        }
    }
}

pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    environment: Environment,
}

impl RemoteClient {
    /// Creates a client from config.
    ///
    /// Returns an error if no base URL is configured.
    pub fn from_config(config: &RemoteConfig, environment: Environment) -> Result<Self, RemoteError> {
        let base_url = config.base_url.clone().ok_or(RemoteError::NotConfigured)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            environment,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Full URL of a collection or document under the environment prefix.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.environment.path(),
            path
        )
    }

    /// Last-modified epoch-millis per collection.
    pub async fn fetch_timestamps(&self) -> Result<TimestampMap, RemoteError> {
        let value: Value = self.get_json(TIMESTAMPS_DOCUMENT, &[]).await?;
        parse_timestamps(&value)
    }

    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        table: TableKey,
    ) -> Result<Vec<T>, RemoteError> {
        self.get_json(table.collection(), &[]).await
    }

    /// Measures are required catalog data; an empty response is treated as
    /// an error so the local copy is not wiped.
    pub async fn fetch_measures(&self) -> Result<Vec<Measure>, RemoteError> {
        let measures: Vec<Measure> = self.fetch_collection(TableKey::Measures).await?;
        if measures.is_empty() {
            return Err(RemoteError::EmptyList(TableKey::Measures.to_string()));
        }
        Ok(measures)
    }

    pub async fn fetch_order_lines(
        &self,
        user_id: &str,
        week: u32,
    ) -> Result<Vec<OrderLine>, RemoteError> {
        let week = week.to_string();
        self.get_json(
            TableKey::OrderLines.collection(),
            &[("userId", user_id), ("week", week.as_str())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        let url = self.url_for(path);
        tracing::debug!("GET {}", url);

        let mut request = self.http.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json().await?)
    }
}

impl RemoteTimestampSource for RemoteClient {
    async fn remote_timestamps(&self) -> Result<TimestampMap, SyncError> {
        Ok(self.fetch_timestamps().await?)
    }
}

/// Reads the timestamps document. Unknown collection names are ignored.
pub fn parse_timestamps(value: &Value) -> Result<TimestampMap, RemoteError> {
    let object = value.as_object().ok_or_else(|| {
        RemoteError::Unknown(format!("{} is not an object", TIMESTAMPS_DOCUMENT))
    })?;

    let mut timestamps = TimestampMap::new();
    for (name, raw) in object {
        let Ok(table) = TableKey::from_str(name) else {
            tracing::debug!("Ignoring timestamp for unknown collection '{}'", name);
            continue;
        };
        let millis = raw.as_i64().ok_or_else(|| {
            RemoteError::Unknown(format!("timestamp for '{}' is not an integer", name))
        })?;
        timestamps.insert(table, millis);
    }

    Ok(timestamps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str, environment: Environment) -> RemoteClient {
        let config = RemoteConfig {
            base_url: Some(base_url.to_string()),
            ..RemoteConfig::default()
        };
        RemoteClient::from_config(&config, environment).unwrap()
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let result = RemoteClient::from_config(&RemoteConfig::default(), Environment::Develop);
        assert!(matches!(result, Err(RemoteError::NotConfigured)));
    }

    #[test]
    fn test_url_for_uses_environment_prefix() {
        let dev = client("https://coop.example.com/", Environment::Develop);
        assert_eq!(
            dev.url_for("orderLines"),
            "https://coop.example.com/develop/orderLines"
        );

        let prod = client("https://coop.example.com", Environment::Production);
        assert_eq!(
            prod.url_for(TIMESTAMPS_DOCUMENT),
            "https://coop.example.com/production/syncTimestamps"
        );
    }

    #[test]
    fn test_parse_timestamps() {
        let value = json!({
            "users": 1_700_000_000_000i64,
            "orderLines": 1_700_000_500_000i64,
            "legacyStuff": 1
        });

        let timestamps = parse_timestamps(&value).unwrap();
        assert_eq!(timestamps.len(), 2);
        assert_eq!(timestamps[&TableKey::Users], 1_700_000_000_000);
        assert_eq!(timestamps[&TableKey::OrderLines], 1_700_000_500_000);
    }

    #[test]
    fn test_parse_timestamps_rejects_bad_shapes() {
        assert!(matches!(
            parse_timestamps(&json!([1, 2])),
            Err(RemoteError::Unknown(_))
        ));
        assert!(matches!(
            parse_timestamps(&json!({"users": "yesterday"})),
            Err(RemoteError::Unknown(_))
        ));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(Environment::from_str("PROD").unwrap(), Environment::Production);
        assert_eq!(Environment::from_str("develop").unwrap(), Environment::Develop);
        assert!(Environment::from_str("staging").is_err());
    }
}
