//! StatusCake uptime monitoring back-end.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::cache::{DEFAULT_LIST_CACHE_TTL, ListCache};
use super::{MonitorError, MonitorService};
use crate::config::Provider;
use crate::models::Monitor;

pub mod mappers;
pub mod responses;

use mappers::{from_overviews, from_wire, join_csv, to_wire};
use responses::{
    ApiErrorBody, CreatedResponse, UptimeTest, UptimeTestOverview, UptimeTestResponse, UptimeTests,
};

pub const DEFAULT_API_URL: &str = "https://api.statuscake.com/v1";

/// Upper bound on list pages fetched in one go. Guards against page-count
/// metadata that never lets the loop reach its last page.
pub const MAX_PAGES: u32 = 1000;

pub struct StatusCakeMonitorService {
    api_url: String,
    username: String,
    cgroup: String,
    client: Client,
    cache: ListCache<Vec<UptimeTestOverview>>,
}

impl StatusCakeMonitorService {
    pub fn setup(provider: &Provider) -> Result<Self, MonitorError> {
        Self::setup_with_cache_ttl(provider, DEFAULT_LIST_CACHE_TTL)
    }

    /// Copies the provider settings and builds the bearer-authenticated client.
    pub fn setup_with_cache_ttl(
        provider: &Provider,
        cache_ttl: Duration,
    ) -> Result<Self, MonitorError> {
        if provider.api_key.is_empty() {
            return Err(MonitorError::InvalidConfiguration(
                "StatusCake requires an api_key".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", provider.api_key))
            .map_err(|e| MonitorError::InvalidConfiguration(format!("Invalid api_key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        let api_url = if provider.api_url.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            provider.api_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            api_url,
            username: provider.username.clone(),
            cgroup: provider.alert_contacts.clone(),
            client,
            cache: ListCache::new(cache_ttl),
        })
    }

    fn uptime_url(&self) -> String {
        format!("{}/uptime", self.api_url)
    }

    fn uptime_test_url(&self, id: &str) -> String {
        format!("{}/uptime/{}", self.api_url, urlencoding::encode(id))
    }

    /// Builds the uptime test this monitor maps to, using the account's default
    /// contact groups.
    pub fn uptime_test(&self, monitor: &Monitor) -> UptimeTest {
        to_wire(monitor, &self.cgroup)
    }

    async fn fetch_page(&self, page: u32) -> Result<UptimeTests, MonitorError> {
        let response = self
            .client
            .get(self.uptime_url())
            .query(&[("page", page)])
            .send()
            .await?;
        let response = ensure_success("List uptime tests", response).await?;
        Ok(response.json::<UptimeTests>().await?)
    }

    /// Fetches every page of the uptime test list, in page order.
    #[instrument(skip(self), fields(username = %self.username))]
    pub async fn fetch_all(&self) -> Result<Vec<UptimeTestOverview>, MonitorError> {
        let mut tests = Vec::new();
        let mut page = 1;

        loop {
            if page > MAX_PAGES {
                return Err(MonitorError::PageLimitExceeded { pages: MAX_PAGES });
            }

            let result = self.fetch_page(page).await?;
            debug!(
                page,
                page_count = result.metadata.page_count,
                items = result.data.len(),
                "Fetched uptime test page."
            );
            tests.extend(result.data);

            if page >= result.metadata.page_count {
                break;
            }
            page += 1;
        }

        Ok(tests)
    }

    async fn create(&self, test: &UptimeTest) -> Result<String, MonitorError> {
        let response = self
            .client
            .post(self.uptime_url())
            .form(&uptime_test_form(test, true))
            .send()
            .await?;
        let response = ensure_success("Create uptime test", response).await?;
        let created: CreatedResponse = response.json().await?;
        Ok(created.data.new_id)
    }

    async fn put(&self, id: &str, test: &UptimeTest) -> Result<(), MonitorError> {
        let response = self
            .client
            .put(self.uptime_test_url(id))
            .form(&uptime_test_form(test, false))
            .send()
            .await?;
        ensure_success("Update uptime test", response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), MonitorError> {
        let response = self.client.delete(self.uptime_test_url(id)).send().await?;
        ensure_success("Delete uptime test", response).await?;
        Ok(())
    }
}

#[async_trait]
impl MonitorService for StatusCakeMonitorService {
    #[instrument(skip(self), fields(username = %self.username))]
    async fn get_by_name(&self, name: &str) -> Result<Monitor, MonitorError> {
        let monitors = self.get_all().await?;
        monitors
            .into_iter()
            .find(|monitor| monitor.name == name)
            .ok_or_else(|| MonitorError::NotFound {
                name: name.to_string(),
            })
    }

    #[instrument(skip(self), fields(username = %self.username))]
    async fn get_by_id(&self, id: &str) -> Result<Monitor, MonitorError> {
        let result = async {
            let response = self.client.get(self.uptime_test_url(id)).send().await?;
            let response = ensure_success("Get uptime test", response).await?;
            Ok::<_, MonitorError>(response.json::<UptimeTestResponse>().await?)
        }
        .await;

        match result {
            Ok(response) => Ok(from_wire(response.data)),
            Err(e) => {
                error!(id = %id, error = %e, "Getting monitor failed.");
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(username = %self.username))]
    async fn get_all(&self) -> Result<Vec<Monitor>, MonitorError> {
        if let Some(cached) = self.cache.get() {
            return Ok(from_overviews(cached));
        }

        let tests = self.fetch_all().await.map_err(|e| {
            error!(error = %e, "Getting all monitors failed.");
            e
        })?;
        self.cache.set(tests.clone());

        Ok(from_overviews(tests))
    }

    #[instrument(skip_all, fields(username = %self.username, monitor = %monitor.name))]
    async fn add(&self, monitor: &Monitor) -> Result<String, MonitorError> {
        let test = self.uptime_test(monitor);
        let result = self.create(&test).await;
        // A failed create may still have been applied remotely.
        self.cache.invalidate();

        match result {
            Ok(id) => {
                info!(id = %id, "Added monitor.");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Adding monitor failed.");
                Err(e)
            }
        }
    }

    #[instrument(
        skip_all,
        fields(username = %self.username, monitor = %monitor.name, id = %monitor.id)
    )]
    async fn update(&self, monitor: &Monitor) -> Result<(), MonitorError> {
        let test = self.uptime_test(monitor);
        let result = if monitor.id.is_empty() {
            Err(MonitorError::InvalidConfiguration(format!(
                "monitor '{}' has no id to update",
                monitor.name
            )))
        } else {
            self.put(&monitor.id, &test).await
        };
        self.cache.invalidate();

        match result {
            Ok(()) => {
                info!("Updated monitor.");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Updating monitor failed.");
                Err(e)
            }
        }
    }

    #[instrument(
        skip_all,
        fields(username = %self.username, monitor = %monitor.name, id = %monitor.id)
    )]
    async fn remove(&self, monitor: &Monitor) {
        if monitor.id.is_empty() {
            self.cache.invalidate();
            warn!("Monitor has no id, nothing to delete.");
            return;
        }

        let result = self.delete(&monitor.id).await;
        self.cache.invalidate();

        match result {
            Ok(()) => info!("Deleted monitor."),
            Err(e) => error!(error = %e, "Deleting monitor failed."),
        }
    }

    fn equal(&self, old: &Monitor, new: &Monitor) -> bool {
        if self.uptime_test(old) != self.uptime_test(new) {
            info!(monitor = %old.name, "Changes detected for monitor.");
            return false;
        }
        true
    }
}

/// Form fields for create (`include_test_type`) and update requests.
/// The test type of an existing uptime test cannot be changed.
fn uptime_test_form(test: &UptimeTest, include_test_type: bool) -> Vec<(&'static str, String)> {
    let mut form = vec![("name", test.name.clone())];
    if include_test_type {
        form.push(("test_type", test.test_type.to_string()));
    }
    form.push(("website_url", test.website_url.clone()));
    form.push(("check_rate", test.check_rate.to_string()));
    for group in &test.contact_groups {
        form.push(("contact_groups[]", group.clone()));
    }
    for tag in &test.tags {
        form.push(("tags[]", tag.clone()));
    }
    form.push(("status_codes_csv", join_csv(&test.status_codes)));
    form.push(("paused", test.paused.to_string()));
    form.push(("follow_redirects", test.follow_redirects.to_string()));
    form.push(("enable_ssl_alert", test.enable_ssl_alert.to_string()));
    form.push(("trigger_rate", test.trigger_rate.to_string()));
    form.push(("confirmation", test.confirmation.to_string()));
    form.push(("find_string", test.find_string.clone().unwrap_or_default()));
    form
}

/// Turns a non-2xx response into [`MonitorError::Api`], keeping StatusCake's message.
async fn ensure_success(
    operation: &'static str,
    response: Response,
) -> Result<Response, MonitorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.to_string(),
        _ => body,
    };

    Err(MonitorError::Api {
        operation,
        status,
        message,
    })
}
