//! Backend status monitor.

use ragdesk_client::{HealthStatus, RagBackend};
use serde::Serialize;

/// Availability of the backend as last probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackendStatus {
    Unknown,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BackendStatus::Unknown => "Checking backend...",
            BackendStatus::Online => "Backend Online",
            BackendStatus::Offline => "Backend Offline",
        }
    }
}

impl From<HealthStatus> for BackendStatus {
    fn from(health: HealthStatus) -> Self {
        match health {
            HealthStatus::Ok => BackendStatus::Online,
            HealthStatus::Unreachable => BackendStatus::Offline,
        }
    }
}

/// Probe the backend once. There is no polling.
pub async fn probe(backend: &dyn RagBackend) -> BackendStatus {
    let status = BackendStatus::from(backend.check_health().await);
    tracing::info!("{} ({})", status.label(), backend.base_url());
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_maps_to_status() {
        assert_eq!(BackendStatus::from(HealthStatus::Ok), BackendStatus::Online);
        assert_eq!(
            BackendStatus::from(HealthStatus::Unreachable),
            BackendStatus::Offline
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(BackendStatus::Online.label(), "Backend Online");
        assert_eq!(BackendStatus::Offline.label(), "Backend Offline");
    }
}
