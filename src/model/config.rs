use crate::model::associate::AssociateInfo;
use crate::model::{Associate, Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_STORY_POINTS_FIELD: &str = "customfield_12310243";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jira: JiraConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub associates: IndexMap<String, AssociateInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_story_points_field")]
    pub story_points_field: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_github_api_url(),
        }
    }
}

fn default_story_points_field() -> String {
    DEFAULT_STORY_POINTS_FIELD.to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

// Create
impl Config {
    pub fn from_config(path: &str) -> Result<Self> {
        let yaml_str = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("reading `{path}`: {err}")))?;
        Self::parse(&yaml_str)
    }
}

// Parser
impl Config {
    fn parse(yaml_str: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml_str)?;
        if config.jira.url.trim().is_empty() {
            return Err(Error::Config("missing 'jira.url' field".into()));
        }
        Ok(config)
    }
}

// Associates
impl Config {
    /// One associate by name, or every configured associate in file order.
    pub fn select_associates(&self, name: Option<&str>) -> Result<Vec<Associate>> {
        match name {
            Some(name) => {
                let Some(info) = self.associates.get(name) else {
                    return Err(Error::UnknownAssociate(name.to_string()));
                };
                Ok(vec![Associate::new(name, info)])
            }
            None if self.associates.is_empty() => {
                Err(Error::Config("no associates found in config file".into()))
            }
            None => Ok(self
                .associates
                .iter()
                .map(|(name, info)| Associate::new(name, info))
                .collect()),
        }
    }
}
