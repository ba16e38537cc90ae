//! Translation between [`Monitor`] and StatusCake uptime tests.

use tracing::warn;

use super::responses::{
    CHECK_RATE_FIVE_MINUTES, UptimeTest, UptimeTestOverview, UptimeTestType,
};
use crate::models::{Monitor, ProviderConfig, StatusCakeConfig};

/// Status codes StatusCake treats as "down" unless a monitor overrides them.
pub const DEFAULT_STATUS_CODES: &[&str] = &[
    "204", // No content
    "205", // Reset content
    "206", // Partial content
    "303", // See other
    "305", // Use proxy
    // 4xx client errors, including Cloudflare's 444/499
    "400", "401", "402", "403", "404", "405", "406", "407", "408", "409", "410", "411", "412",
    "413", "414", "415", "416", "417", "418", "421", "422", "423", "424", "425", "426", "428",
    "429", "431", "444", "451", "499",
    // 5xx server errors, including Cloudflare's 52x
    "500", "501", "502", "503", "504", "505", "506", "507", "508", "509", "510", "511", "520",
    "521", "522", "523", "524", "525", "526", "527", "530", "598", "599",
];

/// Splits a comma-separated setting. No escaping: a literal comma always separates.
pub fn split_csv(values: &str) -> Vec<String> {
    values.split(',').map(str::to_string).collect()
}

pub fn join_csv(values: &[String]) -> String {
    values.join(",")
}

/// Query-unescapes a monitor URL (`%XX` sequences and `+` as space).
fn unescape_url(raw: &str) -> String {
    match urlencoding::decode(&raw.replace('+', " ")) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!(
                url = %raw,
                error = %e,
                "Monitor URL does not decode to UTF-8, sending it as is."
            );
            raw.to_string()
        }
    }
}

/// Builds the uptime test StatusCake should hold for `monitor`.
///
/// `fallback_contact_groups` is the account-wide, comma-separated default used
/// when the monitor does not name its own contact groups. The returned test
/// never carries an id.
pub fn to_wire(monitor: &Monitor, fallback_contact_groups: &str) -> UptimeTest {
    let config = monitor.status_cake_config();

    let test_type = match config {
        Some(c) if !c.test_type.is_empty() => UptimeTestType::from(c.test_type.clone()),
        _ => UptimeTestType::Http,
    };

    let check_rate = match config {
        Some(c) if c.check_rate > 0 => c.check_rate,
        _ => CHECK_RATE_FIVE_MINUTES,
    };

    let contact_groups = match config {
        Some(c) if !c.contact_group.is_empty() => split_csv(&c.contact_group),
        _ if !fallback_contact_groups.is_empty() => split_csv(fallback_contact_groups),
        _ => Vec::new(),
    };

    let tags = match config {
        Some(c) if !c.test_tags.is_empty() => split_csv(&c.test_tags),
        _ => Vec::new(),
    };

    let status_codes = match config {
        Some(c) if !c.status_codes.is_empty() => split_csv(&c.status_codes),
        _ => DEFAULT_STATUS_CODES.iter().map(|code| code.to_string()).collect(),
    };

    UptimeTest {
        id: String::new(),
        name: monitor.name.clone(),
        test_type,
        website_url: unescape_url(&monitor.url),
        check_rate,
        contact_groups,
        tags,
        status_codes,
        paused: config.is_some_and(|c| c.paused),
        follow_redirects: config.is_some_and(|c| c.follow_redirect),
        enable_ssl_alert: config.is_some_and(|c| c.enable_ssl_alert),
        trigger_rate: config.map_or(0, |c| c.trigger_rate.max(0)),
        confirmation: config.map_or(0, |c| c.confirmation.max(0)),
        // Required by the API even when unset.
        find_string: Some(config.map(|c| c.find_string.clone()).unwrap_or_default()),
    }
}

/// Maps a full uptime test back to a monitor.
pub fn from_wire(test: UptimeTest) -> Monitor {
    let config = StatusCakeConfig {
        check_rate: test.check_rate,
        test_type: test.test_type.into(),
        paused: test.paused,
        follow_redirect: test.follow_redirects,
        enable_ssl_alert: test.enable_ssl_alert,
        test_tags: join_csv(&test.tags),
        status_codes: join_csv(&test.status_codes),
        trigger_rate: test.trigger_rate,
        confirmation: test.confirmation,
        find_string: test.find_string.unwrap_or_default(),
        contact_group: join_csv(&test.contact_groups),
    };

    Monitor {
        id: test.id,
        name: test.name,
        url: test.website_url,
        config: Some(ProviderConfig::StatusCake(config)),
    }
}

/// Maps a list entry back to a monitor. Fields the overview lacks stay at their defaults.
pub fn from_overview(overview: UptimeTestOverview) -> Monitor {
    let config = StatusCakeConfig {
        check_rate: overview.check_rate,
        test_type: overview.test_type.into(),
        paused: overview.paused,
        test_tags: join_csv(&overview.tags),
        contact_group: join_csv(&overview.contact_groups),
        ..Default::default()
    };

    Monitor {
        id: overview.id,
        name: overview.name,
        url: overview.website_url,
        config: Some(ProviderConfig::StatusCake(config)),
    }
}

pub fn from_overviews(overviews: Vec<UptimeTestOverview>) -> Vec<Monitor> {
    overviews.into_iter().map(from_overview).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_cake(config: StatusCakeConfig) -> ProviderConfig {
        ProviderConfig::StatusCake(config)
    }

    #[test]
    fn test_defaults_without_config() {
        let monitor = Monitor::new("checkout", "https://shop.example.com");
        let test = to_wire(&monitor, "");

        assert!(test.id.is_empty());
        assert_eq!(test.name, "checkout");
        assert_eq!(test.test_type, UptimeTestType::Http);
        assert_eq!(test.check_rate, CHECK_RATE_FIVE_MINUTES);
        assert_eq!(test.status_codes, DEFAULT_STATUS_CODES);
        assert!(test.tags.is_empty());
        assert!(test.contact_groups.is_empty());
        assert_eq!(test.find_string.as_deref(), Some(""));
        assert!(!test.paused && !test.follow_redirects && !test.enable_ssl_alert);
        assert_eq!((test.trigger_rate, test.confirmation), (0, 0));
    }

    #[test]
    fn test_default_status_codes_cover_error_classes() {
        assert!(DEFAULT_STATUS_CODES.contains(&"404"));
        assert!(DEFAULT_STATUS_CODES.contains(&"503"));
        assert!(DEFAULT_STATUS_CODES.contains(&"522"));
        assert!(!DEFAULT_STATUS_CODES.contains(&"200"));
        assert_eq!(DEFAULT_STATUS_CODES.len(), 59);
    }

    #[test]
    fn test_url_is_unescaped() {
        let monitor = Monitor::new("m", "https%3A%2F%2Fshop.example.com%2Fcart%3Fq%3Da+b");
        assert_eq!(
            to_wire(&monitor, "").website_url,
            "https://shop.example.com/cart?q=a b"
        );
    }

    #[test]
    fn test_fallback_contact_group() {
        let monitor = Monitor::new("m", "https://example.com");
        assert_eq!(to_wire(&monitor, "team-a").contact_groups, vec!["team-a"]);

        let own = monitor.with_config(status_cake(StatusCakeConfig {
            contact_group: "team-b,team-c".to_string(),
            ..Default::default()
        }));
        assert_eq!(to_wire(&own, "team-a").contact_groups, vec!["team-b", "team-c"]);
    }

    #[test]
    fn test_status_code_override() {
        let monitor = Monitor::new("m", "https://example.com").with_config(status_cake(
            StatusCakeConfig {
                status_codes: "500,502".to_string(),
                ..Default::default()
            },
        ));
        assert_eq!(to_wire(&monitor, "").status_codes, vec!["500", "502"]);
    }

    #[test]
    fn test_config_values_pass_through() {
        let monitor = Monitor::new("m", "example.com:22").with_config(status_cake(
            StatusCakeConfig {
                check_rate: 60,
                test_type: "TCP".to_string(),
                paused: true,
                follow_redirect: true,
                enable_ssl_alert: true,
                test_tags: "prod,shop".to_string(),
                trigger_rate: 5,
                confirmation: 2,
                find_string: "OK".to_string(),
                ..Default::default()
            },
        ));
        let test = to_wire(&monitor, "");

        assert_eq!(test.test_type, UptimeTestType::Tcp);
        assert_eq!(test.check_rate, 60);
        assert!(test.paused && test.follow_redirects && test.enable_ssl_alert);
        assert_eq!(test.tags, vec!["prod", "shop"]);
        assert_eq!((test.trigger_rate, test.confirmation), (5, 2));
        assert_eq!(test.find_string.as_deref(), Some("OK"));
    }

    #[test]
    fn test_non_positive_numbers_fall_back() {
        let monitor = Monitor::new("m", "https://example.com").with_config(status_cake(
            StatusCakeConfig {
                check_rate: -1,
                trigger_rate: -3,
                confirmation: 0,
                ..Default::default()
            },
        ));
        let test = to_wire(&monitor, "");

        assert_eq!(test.check_rate, CHECK_RATE_FIVE_MINUTES);
        assert_eq!((test.trigger_rate, test.confirmation), (0, 0));
    }

    #[test]
    fn test_comma_inside_value_is_split() {
        assert_eq!(split_csv("a,b"), vec!["a", "b"]);
        assert_eq!(split_csv("a\\,b"), vec!["a\\", "b"]);
    }

    #[test]
    fn test_full_round_trip() {
        let monitor = Monitor::new("checkout", "https://shop.example.com").with_config(
            status_cake(StatusCakeConfig {
                check_rate: 60,
                test_type: "HTTP".to_string(),
                paused: true,
                follow_redirect: true,
                enable_ssl_alert: true,
                test_tags: "prod".to_string(),
                status_codes: "500,502".to_string(),
                trigger_rate: 4,
                confirmation: 1,
                find_string: "OK".to_string(),
                contact_group: "team-a".to_string(),
            }),
        );

        let mut wire = to_wire(&monitor, "");
        wire.id = "42".to_string();
        let back = from_wire(wire);

        assert_eq!(back.id, "42");
        assert_eq!(back.name, monitor.name);
        assert_eq!(back.url, monitor.url);
        assert_eq!(back.config, monitor.config);
    }

    #[test]
    fn test_overview_keeps_overview_fields_only() {
        let overview = UptimeTestOverview {
            id: "7".to_string(),
            name: "api".to_string(),
            test_type: UptimeTestType::Head,
            website_url: "https://api.example.com".to_string(),
            check_rate: 900,
            contact_groups: vec!["1".to_string(), "2".to_string()],
            tags: vec!["prod".to_string()],
            paused: true,
            status: Some("up".to_string()),
            uptime: Some(100.0),
        };

        let monitor = from_overview(overview);
        let config = monitor.status_cake_config().unwrap();

        assert_eq!(monitor.id, "7");
        assert_eq!(monitor.url, "https://api.example.com");
        assert_eq!(config.test_type, "HEAD");
        assert_eq!(config.check_rate, 900);
        assert_eq!(config.contact_group, "1,2");
        assert_eq!(config.test_tags, "prod");
        assert!(config.paused);
        assert!(config.status_codes.is_empty());
        assert!(config.find_string.is_empty());
    }
}
