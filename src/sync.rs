//! One-shot synchronization of desired monitors against a provider.

use reqwest::StatusCode;
use tracing::{debug, info};

use crate::models::Monitor;
use crate::monitors::{MonitorError, MonitorService};

/// What [`apply`] did to bring the remote monitor in line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Created(String),
    Updated(String),
    Unchanged(String),
}

fn is_absent(error: &MonitorError) -> bool {
    match error {
        MonitorError::NotFound { .. } => true,
        MonitorError::Api { status, .. } => *status == StatusCode::NOT_FOUND,
        _ => false,
    }
}

/// Looks a monitor up by id when one is known, otherwise by name.
///
/// Only a missing monitor reads as `Ok(None)`. Transport failures, rate limits
/// and server errors are returned so callers never mistake them for absence.
pub async fn find_monitor<S>(
    service: &S,
    id: Option<&str>,
    name: &str,
) -> Result<Option<Monitor>, MonitorError>
where
    S: MonitorService + ?Sized,
{
    let result = match id.filter(|id| !id.is_empty()) {
        Some(id) => service.get_by_id(id).await,
        None => service.get_by_name(name).await,
    };

    match result {
        Ok(monitor) => Ok(Some(monitor)),
        Err(e) if is_absent(&e) => {
            debug!(monitor = %name, error = %e, "Monitor lookup found nothing.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Creates the monitor if it does not exist remotely, updates it if the
/// provider would store something different, and leaves it alone otherwise.
pub async fn apply<S>(service: &S, desired: &Monitor) -> Result<SyncAction, MonitorError>
where
    S: MonitorService + ?Sized,
{
    let existing = find_monitor(service, Some(desired.id.as_str()), &desired.name).await?;

    let Some(mut remote) = existing else {
        let id = service.add(desired).await?;
        return Ok(SyncAction::Created(id));
    };

    // Name lookups return the list shape, which lacks fields that matter for comparison.
    if desired.id.is_empty() {
        remote = service.get_by_id(&remote.id).await?;
    }

    if !service.needs_update(&remote, desired) {
        debug!(monitor = %desired.name, id = %remote.id, "Monitor is up to date.");
        return Ok(SyncAction::Unchanged(remote.id));
    }

    let updated = Monitor {
        id: remote.id.clone(),
        ..desired.clone()
    };
    service.update(&updated).await?;
    info!(monitor = %desired.name, id = %remote.id, "Monitor synchronized.");
    Ok(SyncAction::Updated(remote.id))
}

/// Removes the monitor with the given name. Returns `Ok(false)` when there was none.
pub async fn delete<S>(service: &S, name: &str) -> Result<bool, MonitorError>
where
    S: MonitorService + ?Sized,
{
    match find_monitor(service, None, name).await? {
        Some(monitor) => {
            service.remove(&monitor).await;
            Ok(true)
        }
        None => Ok(false),
    }
}
