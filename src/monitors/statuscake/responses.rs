//! Wire shapes of the StatusCake uptime API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Check interval StatusCake applies when nothing else is configured.
pub const CHECK_RATE_FIVE_MINUTES: i32 = 300;

/// Kind of uptime test. Values StatusCake may add later are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UptimeTestType {
    #[default]
    Http,
    Head,
    Tcp,
    Dns,
    Smtp,
    Ssh,
    Ping,
    Push,
    Other(String),
}

impl UptimeTestType {
    pub fn as_str(&self) -> &str {
        match self {
            UptimeTestType::Http => "HTTP",
            UptimeTestType::Head => "HEAD",
            UptimeTestType::Tcp => "TCP",
            UptimeTestType::Dns => "DNS",
            UptimeTestType::Smtp => "SMTP",
            UptimeTestType::Ssh => "SSH",
            UptimeTestType::Ping => "PING",
            UptimeTestType::Push => "PUSH",
            UptimeTestType::Other(value) => value,
        }
    }
}

impl From<String> for UptimeTestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HTTP" => UptimeTestType::Http,
            "HEAD" => UptimeTestType::Head,
            "TCP" => UptimeTestType::Tcp,
            "DNS" => UptimeTestType::Dns,
            "SMTP" => UptimeTestType::Smtp,
            "SSH" => UptimeTestType::Ssh,
            "PING" => UptimeTestType::Ping,
            "PUSH" => UptimeTestType::Push,
            _ => UptimeTestType::Other(value),
        }
    }
}

impl From<UptimeTestType> for String {
    fn from(value: UptimeTestType) -> Self {
        match value {
            UptimeTestType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UptimeTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full uptime test, as returned by `GET /uptime/{id}` and as sent on create/update.
///
/// Change detection compares two of these field by field, so every field that
/// is sent to StatusCake must live here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeTest {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub test_type: UptimeTestType,
    pub website_url: String,
    #[serde(default)]
    pub check_rate: i32,
    #[serde(default)]
    pub contact_groups: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status_codes: Vec<String>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub follow_redirects: bool,
    #[serde(default)]
    pub enable_ssl_alert: bool,
    #[serde(default)]
    pub trigger_rate: i32,
    #[serde(default)]
    pub confirmation: i32,
    #[serde(default)]
    pub find_string: Option<String>,
}

/// Reduced uptime test shape returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeTestOverview {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub test_type: UptimeTestType,
    pub website_url: String,
    #[serde(default)]
    pub check_rate: i32,
    #[serde(default)]
    pub contact_groups: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub uptime: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub page_count: u32,
    pub total_count: u32,
}

/// One page of `GET /uptime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UptimeTests {
    #[serde(default)]
    pub data: Vec<UptimeTestOverview>,
    pub metadata: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UptimeTestResponse {
    pub data: UptimeTest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedData {
    pub new_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub data: CreatedData,
}

/// Error body StatusCake attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for (field, messages) in &self.errors {
            write!(f, "; {}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}
