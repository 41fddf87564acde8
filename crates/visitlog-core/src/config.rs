//! Compiled-in recorder configuration.

use std::time::Duration;

/// Remote store location (no trailing slash). Replaced at deploy time.
pub const DEFAULT_BASE_URL: &str = "https://your-project.supabase.co";
/// Shared anonymous credential for the insert-only API.
pub const DEFAULT_API_KEY: &str = "YOUR_SUPABASE_ANON_KEY";

pub const SESSIONS_TABLE: &str = "clock_sessions";
pub const UPDATES_TABLE: &str = "session_updates";

/// Banner text that switches the seasonal display flag on.
pub const SEASONAL_MARKER: &str = "RAMADAN";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub base_url: String,
    pub api_key: String,
    pub sessions_table: String,
    pub updates_table: String,
    /// Delay after page load before the session opens.
    pub start_delay: Duration,
    /// Period of the duration heartbeat.
    pub update_period: Duration,
    /// Oldest cached position accepted from the host.
    pub location_max_age: Duration,
    /// Optional hard ceiling on the location read. The default `None` waits
    /// as long as the host does.
    pub location_timeout: Option<Duration>,
    /// Per-request ceiling for ordinary writes.
    pub request_timeout: Duration,
    pub seasonal_marker: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            sessions_table: SESSIONS_TABLE.to_string(),
            updates_table: UPDATES_TABLE.to_string(),
            start_delay: Duration::from_secs(3),
            update_period: Duration::from_secs(60),
            location_max_age: Duration::from_secs(5 * 60),
            location_timeout: None,
            request_timeout: Duration::from_secs(10),
            seasonal_marker: SEASONAL_MARKER.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Whether the host's banner text switches seasonal mode on.
    pub fn is_seasonal(&self, banner: Option<&str>) -> bool {
        banner.is_some_and(|text| text.contains(self.seasonal_marker.as_str()))
    }
}
