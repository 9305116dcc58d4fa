//! Data-transfer types shared by the proxy and the HTTP API.
//!
//! All types use camelCase on the wire. They are request-scoped values: built
//! once per call and dropped when the call returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registration request. Forwarded upstream as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign-in request. Forwarded upstream as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Bearer token for protected calls.
    pub token: String,
    /// Upstream user document, passed through untouched.
    pub user: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// A new SenseBox to register upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseBoxSpec {
    pub name: String,
    /// `"indoor"`, `"outdoor"`, ... (not validated locally).
    pub exposure: String,
    pub model: String,
    pub location: BoxLocation,
    #[serde(default)]
    pub sensors: Vec<SensorSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// One sensor on a SenseBox. Missing fields default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SensorSpec {
    pub title: String,
    pub unit: String,
    #[serde(alias = "sensortype")]
    pub sensor_type: String,
    pub icon: String,
}

/// Upstream acknowledgement of a created SenseBox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseBoxCreated {
    pub id: String,
    pub message: String,
}

/// A SenseBox as read back from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseBox {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub exposure: String,
    #[serde(default)]
    pub model: String,
    pub location: SenseBoxLocation,
    #[serde(default)]
    pub sensors: Vec<SensorSpec>,
}

/// GeoJSON-style point: `[longitude, latitude]`, optionally followed by height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseBoxLocation {
    pub coordinates: Vec<f64>,
}

/// Local answer to a successful logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
    pub success: bool,
}
