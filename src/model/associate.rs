use serde::Deserialize;

/// A person a report is generated for.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Associate {
    pub name: String,
    pub jira_username: String,
    pub github_username: String,
    pub full_name: String,
}

/// Per-associate block of the config file; the name is the mapping key.
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
pub struct AssociateInfo {
    #[serde(default)]
    pub jira_username: String,
    #[serde(default)]
    pub github_username: String,
    #[serde(default)]
    pub full_name: String,
}

// Create
impl Associate {
    pub fn new(name: impl ToString, info: &AssociateInfo) -> Self {
        Self {
            name: name.to_string(),
            jira_username: info.jira_username.clone(),
            github_username: info.github_username.clone(),
            full_name: info.full_name.clone(),
        }
    }
}

impl Associate {
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}
