#![allow(dead_code)]

use serde_json::{Value, json};
use uptime_sync::config::Provider;
use uptime_sync::monitors::statuscake::mappers::DEFAULT_STATUS_CODES;

pub const API_KEY: &str = "test-key";

pub fn provider(api_url: &str, alert_contacts: &str) -> Provider {
    Provider {
        name: "StatusCake".to_string(),
        api_key: API_KEY.to_string(),
        api_url: api_url.to_string(),
        username: "ops".to_string(),
        alert_contacts: alert_contacts.to_string(),
    }
}

pub fn overview(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "test_type": "HTTP",
        "website_url": format!("https://{name}.example.com"),
        "check_rate": 300,
        "contact_groups": [],
        "tags": [],
        "paused": false,
        "status": "up",
        "uptime": 100
    })
}

pub fn page(items: Vec<Value>, page: u32, page_count: u32) -> String {
    json!({
        "data": items,
        "metadata": {
            "page": page,
            "per_page": 25,
            "page_count": page_count,
            "total_count": 0
        }
    })
    .to_string()
}

/// A full uptime test body matching `Monitor::new(name, url)` with no config
/// and no default contact groups.
pub fn default_test(id: &str, name: &str, url: &str) -> String {
    json!({
        "data": {
            "id": id,
            "name": name,
            "test_type": "HTTP",
            "website_url": url,
            "check_rate": 300,
            "contact_groups": [],
            "tags": [],
            "status_codes": DEFAULT_STATUS_CODES,
            "paused": false,
            "follow_redirects": false,
            "enable_ssl_alert": false,
            "trigger_rate": 0,
            "confirmation": 0,
            "find_string": null
        }
    })
    .to_string()
}
