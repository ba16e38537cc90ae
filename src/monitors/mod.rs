use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::config::Provider;
use crate::models::Monitor;

pub mod cache;
pub mod statuscake;

use statuscake::StatusCakeMonitorService;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{operation} failed with status {status}: {message}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        message: String,
    },
    #[error("GetByName Request failed for name: {name}")]
    NotFound { name: String },
    #[error("Pagination did not finish after {pages} pages")]
    PageLimitExceeded { pages: u32 },
    #[error("Unsupported monitor provider: {0}")]
    UnsupportedProvider(String),
    #[error("Invalid provider configuration: {0}")]
    InvalidConfiguration(String),
}

/// The capabilities every monitoring back-end exposes.
///
/// Back-ends are constructed from a [`Provider`] entry; construction plays the
/// role of setup, so an instance is always ready to serve requests.
#[async_trait]
pub trait MonitorService: Send + Sync {
    /// Looks the monitor up in the full (possibly cached) list. Duplicate names
    /// resolve to the first match in fetch order.
    async fn get_by_name(&self, name: &str) -> Result<Monitor, MonitorError>;

    async fn get_by_id(&self, id: &str) -> Result<Monitor, MonitorError>;

    async fn get_all(&self) -> Result<Vec<Monitor>, MonitorError>;

    /// Creates the monitor and returns the provider-assigned id.
    async fn add(&self, monitor: &Monitor) -> Result<String, MonitorError>;

    async fn update(&self, monitor: &Monitor) -> Result<(), MonitorError>;

    /// Deletes the monitor. Failures are logged, not returned.
    async fn remove(&self, monitor: &Monitor);

    /// Whether both monitors would be sent to the provider identically.
    fn equal(&self, old: &Monitor, new: &Monitor) -> bool;

    fn needs_update(&self, remote: &Monitor, desired: &Monitor) -> bool {
        !self.equal(remote, desired)
    }
}

/// Selects the back-end named by a provider entry and forwards calls to it.
pub struct MonitorServiceProxy {
    provider_name: String,
    service: Box<dyn MonitorService>,
}

impl MonitorServiceProxy {
    pub fn new(provider: &Provider) -> Result<Self, MonitorError> {
        Self::with_cache_ttl(provider, cache::DEFAULT_LIST_CACHE_TTL)
    }

    pub fn with_cache_ttl(provider: &Provider, cache_ttl: Duration) -> Result<Self, MonitorError> {
        let service: Box<dyn MonitorService> = match provider.name.to_lowercase().as_str() {
            "statuscake" => Box::new(StatusCakeMonitorService::setup_with_cache_ttl(
                provider, cache_ttl,
            )?),
            _ => return Err(MonitorError::UnsupportedProvider(provider.name.clone())),
        };

        Ok(Self {
            provider_name: provider.name.clone(),
            service,
        })
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

#[async_trait]
impl MonitorService for MonitorServiceProxy {
    async fn get_by_name(&self, name: &str) -> Result<Monitor, MonitorError> {
        self.service.get_by_name(name).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Monitor, MonitorError> {
        self.service.get_by_id(id).await
    }

    async fn get_all(&self) -> Result<Vec<Monitor>, MonitorError> {
        self.service.get_all().await
    }

    async fn add(&self, monitor: &Monitor) -> Result<String, MonitorError> {
        self.service.add(monitor).await
    }

    async fn update(&self, monitor: &Monitor) -> Result<(), MonitorError> {
        self.service.update(monitor).await
    }

    async fn remove(&self, monitor: &Monitor) {
        self.service.remove(monitor).await
    }

    fn equal(&self, old: &Monitor, new: &Monitor) -> bool {
        self.service.equal(old, new)
    }
}
