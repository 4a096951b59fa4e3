//! Device location lookup for nearby mode.
//!
//! A [`LocationSource`] resolves one coordinate per activation. Nothing is
//! cached: turning nearby mode off drops the coordinate.

use std::time::Duration;

use hyetaek_core::Coordinate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const ERROR_PREFIX: &str = "위치 정보를 가져올 수 없습니다. ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            high_accuracy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("location lookup failed: {0}")]
    Unknown(String),

    /// No location source is configured.
    #[error("location service not supported")]
    Unsupported,
}

impl GeolocationError {
    /// Korean message shown inline and as a notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        let detail: &str = match self {
            GeolocationError::PermissionDenied => "위치 정보 접근 권한이 거부되었습니다.",
            GeolocationError::PositionUnavailable => "현재 위치를 확인할 수 없습니다.",
            GeolocationError::Timeout => "위치 정보 요청 시간이 초과되었습니다.",
            GeolocationError::Unknown(message) if !message.trim().is_empty() => message.as_str(),
            GeolocationError::Unknown(_) => "알 수 없는 오류가 발생했습니다.",
            GeolocationError::Unsupported => {
                return "이 환경에서는 위치 정보 서비스를 지원하지 않습니다.".to_string();
            }
        };
        format!("{ERROR_PREFIX}{detail}")
    }
}

/// Where the device coordinate comes from.
#[derive(Debug)]
pub enum LocationSource {
    /// Coordinate supplied by the user.
    Fixed(Coordinate),
    IpLookup(IpLocator),
    Disabled,
}

impl LocationSource {
    /// Resolves the current coordinate within `options.timeout`.
    ///
    /// # Errors
    ///
    /// Returns a classified [`GeolocationError`]; see [`IpLocator::locate`].
    pub async fn locate(&self, options: &PositionOptions) -> Result<Coordinate, GeolocationError> {
        match self {
            LocationSource::Fixed(coordinate) => Ok(*coordinate),
            LocationSource::Disabled => Err(GeolocationError::Unsupported),
            LocationSource::IpLookup(locator) => {
                match tokio::time::timeout(options.timeout, locator.locate(options)).await {
                    Ok(result) => result,
                    Err(_) => Err(GeolocationError::Timeout),
                }
            }
        }
    }
}

/// `{"latitude": 37.5, "longitude": 127.0}` or `{"error": true, "reason": "..."}`
#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// IP-based geolocation over HTTP.
#[derive(Debug)]
pub struct IpLocator {
    client: Client,
    url: String,
}

impl IpLocator {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be constructed.
    pub fn new(url: &str, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// Queries the endpoint once.
    ///
    /// # Errors
    ///
    /// - [`GeolocationError::PermissionDenied`] on HTTP 401/403.
    /// - [`GeolocationError::PositionUnavailable`] on network failure, any
    ///   other non-2xx status, or a body without a valid coordinate.
    /// - [`GeolocationError::Timeout`] when the request times out.
    /// - [`GeolocationError::Unknown`] when the body is malformed or reports
    ///   an error.
    pub async fn locate(&self, options: &PositionOptions) -> Result<Coordinate, GeolocationError> {
        tracing::debug!(
            url = %self.url,
            high_accuracy = options.high_accuracy,
            "requesting ip geolocation"
        );

        let response = self
            .client
            .get(&self.url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeolocationError::PermissionDenied);
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "ip geolocation returned non-success");
            return Err(GeolocationError::PositionUnavailable);
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        let parsed: IpLocationResponse = serde_json::from_str(&body)
            .map_err(|e| GeolocationError::Unknown(format!("malformed location response: {e}")))?;

        if parsed.error {
            return Err(GeolocationError::Unknown(parsed.reason.unwrap_or_default()));
        }

        match (parsed.latitude, parsed.longitude) {
            (Some(latitude), Some(longitude))
                if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) =>
            {
                Ok(Coordinate::new(latitude, longitude))
            }
            _ => Err(GeolocationError::PositionUnavailable),
        }
    }
}

fn classify_transport_error(error: reqwest::Error) -> GeolocationError {
    if error.is_timeout() {
        GeolocationError::Timeout
    } else {
        tracing::warn!(error = %error, "ip geolocation request failed");
        GeolocationError::PositionUnavailable
    }
}
