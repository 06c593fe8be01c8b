use std::sync::OnceLock;
use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;

use crate::config::AppConfig;
use crate::fields::QueryData;
use crate::types::{ApiKey, EdgeFunction};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to initialize tokio runtime")
    })
}

/// Read-only client for the project queries the hook editor needs.
///
/// Requests run on a dedicated tokio runtime so they can be awaited from
/// GPUI's executor.
pub struct ManagementApi {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ManagementApi {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hookform/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// `None` when there is no token or project to query.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        match config.access_token.as_deref() {
            Some(token) if !config.project_ref.is_empty() => {
                Self::new(&config.api_url, token).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn endpoint(&self, project_ref: &str, path: &str) -> String {
        format!("{}/v1/projects/{}/{}", self.base_url, project_ref, path)
    }

    async fn get_json<T: DeserializeOwned + Send + 'static>(&self, url: String) -> Result<T> {
        let request = self.client.get(&url).bearer_auth(&self.access_token);

        let body = runtime()
            .spawn(async move {
                let response = request.send().await?.error_for_status()?;
                response.json::<T>().await
            })
            .await?
            .with_context(|| format!("GET {}", url))?;

        Ok(body)
    }

    pub async fn list_edge_functions(&self, project_ref: &str) -> Result<Vec<EdgeFunction>> {
        self.get_json(self.endpoint(project_ref, "functions")).await
    }

    /// Keys are requested revealed so auth shortcuts can use their values.
    pub async fn list_api_keys(&self, project_ref: &str) -> Result<Vec<ApiKey>> {
        self.get_json(self.endpoint(project_ref, "api-keys?reveal=true"))
            .await
    }

    /// Both queries at once. A failed query contributes an empty list.
    pub async fn load_project(&self, project_ref: &str) -> QueryData {
        let (functions, api_keys) = futures::join!(
            self.list_edge_functions(project_ref),
            self.list_api_keys(project_ref)
        );

        let functions = functions.unwrap_or_else(|e| {
            log::error!("Failed to load edge functions: {:#}", e);
            vec![]
        });
        let api_keys = api_keys.unwrap_or_else(|e| {
            log::error!("Failed to load API keys: {:#}", e);
            vec![]
        });

        log::info!(
            "Loaded {} edge functions and {} API keys for {}",
            functions.len(),
            api_keys.len(),
            project_ref
        );

        QueryData {
            functions,
            api_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let api = ManagementApi::new("https://api.supabase.com/", "sbp_123").unwrap();
        assert_eq!(
            api.endpoint("abcxyz", "functions"),
            "https://api.supabase.com/v1/projects/abcxyz/functions"
        );
        assert_eq!(
            api.endpoint("abcxyz", "api-keys?reveal=true"),
            "https://api.supabase.com/v1/projects/abcxyz/api-keys?reveal=true"
        );
    }

    #[test]
    fn test_from_config_needs_token_and_project() {
        let mut config = AppConfig::default();
        assert!(ManagementApi::from_config(&config).unwrap().is_none());

        config.access_token = Some("sbp_123".to_string());
        assert!(ManagementApi::from_config(&config).unwrap().is_none());

        config.project_ref = "abcxyz".to_string();
        assert!(ManagementApi::from_config(&config).unwrap().is_some());
    }

    #[test]
    fn test_unreachable_api_degrades_to_empty_queries() {
        let api = ManagementApi::new("http://127.0.0.1:9", "sbp_123").unwrap();
        let data = futures::executor::block_on(api.load_project("abcxyz"));
        assert_eq!(data, QueryData::default());
    }
}
