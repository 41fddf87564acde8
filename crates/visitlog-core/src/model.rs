//! Session telemetry types shared between the controller and the remote store.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anonymous 64-bit visitor identifier, rendered as 16 lowercase hex characters.
///
/// Only this digest leaves the device; the signals it was derived from do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorFingerprint(String);

impl VisitorFingerprint {
    /// Number of hex characters kept from the SHA-256 digest.
    pub const LEN: usize = 16;

    pub(crate) fn from_hex(hex: String) -> Self {
        debug_assert_eq!(hex.len(), Self::LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitorFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingSystem {
    #[serde(rename = "iOS")]
    Ios,
    Android,
    #[serde(rename = "macOS")]
    MacOs,
    Windows,
    Linux,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    Safari,
    Firefox,
    Other,
}

/// Categorical device/OS/browser labels, computed once per load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    #[serde(rename = "device_type")]
    pub device: DeviceClass,
    pub os: OperatingSystem,
    pub browser: Browser,
    #[serde(rename = "screen_w")]
    pub screen_width: u32,
    #[serde(rename = "screen_h")]
    pub screen_height: u32,
}

/// Coarse location, never finer than 0.1 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    #[serde(rename = "lat_round")]
    pub latitude: f64,
    #[serde(rename = "lon_round")]
    pub longitude: f64,
}

impl LocationSample {
    /// Round a raw position to one decimal place, half-up toward positive infinity.
    pub fn rounded(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_tenth(latitude),
            longitude: round_tenth(longitude),
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Identifier the remote store assigned to an opened session.
///
/// Kept as the raw JSON value so updates echo it back with the same type
/// the store generated (text or integer key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Value);

impl SessionId {
    /// Pull the `id` out of the first row of a `return=representation` response.
    ///
    /// Anything but a non-empty string or a non-zero number is "no identifier".
    pub fn from_rows(rows: &Value) -> Option<Self> {
        let id = rows.as_array()?.first()?.get("id")?;
        match id {
            Value::String(s) if !s.is_empty() => Some(Self(id.clone())),
            Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(Self(id.clone())),
            _ => None,
        }
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// The row inserted into the sessions table when a session opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    #[serde(rename = "visitor_hash")]
    pub fingerprint: VisitorFingerprint,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "lat_round")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon_round")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub profile: EnvironmentProfile,
    pub dial: String,
    pub numerals: String,
    #[serde(rename = "is_ramadan")]
    pub seasonal: bool,
    #[serde(rename = "duration_s")]
    pub duration_secs: u64,
}

impl SessionRecord {
    pub fn with_location(mut self, location: Option<LocationSample>) -> Self {
        self.latitude = location.map(|l| l.latitude);
        self.longitude = location.map(|l| l.longitude);
        self
    }
}

/// One duration/preference append for an open session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUpdate {
    pub session_id: SessionId,
    #[serde(rename = "duration_s")]
    pub duration_secs: u64,
    pub dial: String,
}
