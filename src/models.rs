use serde::{Deserialize, Serialize};

/// A provider-agnostic description of one uptime check.
///
/// `id` is assigned by the provider and stays empty until the monitor has been
/// created remotely. `url` is kept percent-encoded; providers decode it before
/// sending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProviderConfig>,
}

impl Monitor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            url: url.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// The StatusCake settings of this monitor, if that is the variant it carries.
    pub fn status_cake_config(&self) -> Option<&StatusCakeConfig> {
        self.config.as_ref().and_then(ProviderConfig::as_status_cake)
    }
}

/// Provider-specific tunables attached to a [`Monitor`].
/// Each monitoring back-end contributes exactly one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum ProviderConfig {
    #[serde(rename = "StatusCake", alias = "statuscake")]
    StatusCake(StatusCakeConfig),
}

impl ProviderConfig {
    pub fn as_status_cake(&self) -> Option<&StatusCakeConfig> {
        match self {
            ProviderConfig::StatusCake(config) => Some(config),
        }
    }
}

/// Tunables understood by StatusCake uptime tests.
///
/// `contact_group`, `test_tags` and `status_codes` are comma-separated lists.
/// Values are split on `,` without any escaping, so a single value can never
/// contain a literal comma.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCakeConfig {
    pub check_rate: i32,
    pub test_type: String,
    pub paused: bool,
    pub follow_redirect: bool,
    pub enable_ssl_alert: bool,
    pub test_tags: String,
    pub status_codes: String,
    pub trigger_rate: i32,
    pub confirmation: i32,
    pub find_string: String,
    pub contact_group: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserializes_with_provider_tag() {
        let raw = r#"
            name = "checkout"
            url = "https%3A%2F%2Fshop.example.com"

            [config]
            provider = "StatusCake"
            check_rate = 60
            test_tags = "prod,shop"
        "#;

        let monitor: Monitor = toml::from_str(raw).unwrap();
        assert!(monitor.id.is_empty());

        let config = monitor.status_cake_config().unwrap();
        assert_eq!(config.check_rate, 60);
        assert_eq!(config.test_tags, "prod,shop");
        assert!(!config.paused);
        assert!(config.find_string.is_empty());
    }

    #[test]
    fn test_monitor_without_config() {
        let monitor: Monitor = toml::from_str("name = \"a\"\nurl = \"b\"").unwrap();
        assert_eq!(monitor, Monitor::new("a", "b"));
        assert!(monitor.status_cake_config().is_none());
    }
}
