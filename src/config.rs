use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{HookType, ProjectContext};

pub const DEFAULT_API_URL: &str = "https://api.supabase.com";

/// Settings the editor starts with
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project_ref: String,
    pub rest_url: Option<String>,
    pub api_url: String,
    pub access_token: Option<String>,
    pub hook_type: HookType,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_ref: String::new(),
            rest_url: None,
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            hook_type: HookType::default(),
        }
    }
}

impl AppConfig {
    /// Config file, then `HOOKFORM_*` / `SUPABASE_ACCESS_TOKEN` overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::get_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// `~/.config/hookform/config.json` on Linux
    fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hookform").join("config.json"))
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(project_ref) = non_empty("HOOKFORM_PROJECT_REF") {
            self.project_ref = project_ref;
        }
        if let Some(rest_url) = non_empty("HOOKFORM_REST_URL") {
            self.rest_url = Some(rest_url);
        }
        if let Some(api_url) = non_empty("HOOKFORM_API_URL") {
            self.api_url = api_url;
        }
        if let Some(token) = non_empty("SUPABASE_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(hook_type) = non_empty("HOOKFORM_HOOK_TYPE") {
            match HookType::from_str(&hook_type) {
                Some(hook_type) => self.hook_type = hook_type,
                None => log::warn!(
                    "Unknown HOOKFORM_HOOK_TYPE {:?}, keeping {}",
                    hook_type,
                    self.hook_type.as_str()
                ),
            }
        }
    }

    pub fn project(&self) -> ProjectContext {
        ProjectContext {
            project_ref: self.project_ref.clone(),
            rest_url: self.rest_url.clone(),
        }
    }
}
