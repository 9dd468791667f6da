//! Location providers: permission gate plus a single fix.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::types::{Accuracy, Coordinates, LocationError, Permission};

const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));
/// City-level IP lookups are rarely better than this
const IP_LOOKUP_RADIUS_METERS: f64 = 5000.0;

/// Supplies device coordinates, gated by a user-grantable permission.
///
/// Implementations must not track continuously; each call to
/// `current_position` produces one fix.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground location access. Checked on every fetch.
    async fn request_permission(&self) -> Permission;

    /// Read a single fix with bounded accuracy.
    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError>;
}

#[async_trait]
impl<T: LocationProvider + ?Sized> LocationProvider for Box<T> {
    async fn request_permission(&self) -> Permission {
        (**self).request_permission().await
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        (**self).current_position(accuracy).await
    }
}

/// Coordinates fixed in configuration
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    coordinates: Coordinates,
    permission: Permission,
}

impl FixedLocationProvider {
    pub fn new(coordinates: Coordinates, permission: Permission) -> Self {
        Self {
            coordinates,
            permission,
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

/// Approximate coordinates from an IP geolocation service (ip-api.com JSON shape)
#[derive(Debug, Clone)]
pub struct IpLocationProvider {
    client: Client,
    lookup_url: String,
    permission: Permission,
}

impl IpLocationProvider {
    pub fn new(
        lookup_url: impl Into<String>,
        permission: Permission,
        timeout: Duration,
    ) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            lookup_url: lookup_url.into(),
            permission,
        })
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        if accuracy.radius_meters() < IP_LOOKUP_RADIUS_METERS {
            tracing::debug!(
                "IP lookup cannot meet {:?} accuracy, using city-level fix",
                accuracy
            );
        }

        let response = self
            .client
            .get(&self.lookup_url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocationError::Timeout
                } else {
                    LocationError::Unavailable(format!("IP lookup failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(format!("IP lookup parse error: {}", e)))?;

        match body {
            IpLookupResponse {
                status,
                lat: Some(lat),
                lon: Some(lon),
                ..
            } if status == "success" => {
                tracing::info!("Got location from IP lookup: {:.4}, {:.4}", lat, lon);
                Ok(Coordinates::new(lat, lon))
            }
            IpLookupResponse { message, .. } => Err(LocationError::Unavailable(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "IP lookup failed".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_provider_returns_configured_fix() {
        let provider = FixedLocationProvider::new(Coordinates::new(-12.05, -77.04), Permission::Granted);
        assert_eq!(provider.request_permission().await, Permission::Granted);
        let fix = provider.current_position(Accuracy::High).await.unwrap();
        assert_eq!(fix, Coordinates::new(-12.05, -77.04));
    }

    #[tokio::test]
    async fn test_fixed_provider_reports_denied() {
        let provider = FixedLocationProvider::new(Coordinates::new(0.0, 0.0), Permission::Denied);
        assert_eq!(provider.request_permission().await, Permission::Denied);
    }

    #[tokio::test]
    async fn test_boxed_provider_delegates() {
        let provider: Box<dyn LocationProvider> = Box::new(FixedLocationProvider::new(
            Coordinates::new(1.0, 2.0),
            Permission::Granted,
        ));
        assert_eq!(provider.request_permission().await, Permission::Granted);
        assert_eq!(
            provider.current_position(Accuracy::Low).await.unwrap(),
            Coordinates::new(1.0, 2.0)
        );
    }
}
