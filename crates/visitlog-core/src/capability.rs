//! Injected capabilities: everything the recorder reads from its host.
//!
//! The controller never touches ambient globals. Screen metrics, locale,
//! geolocation, the digest primitive and the host's display preferences all
//! arrive through these traits, so the deriver and classifier stay pure and
//! the controller can run against test doubles.

use std::time::Duration;

use async_trait::async_trait;
use ring::digest;

/// Display metrics as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
}

/// Static and on-demand environment signals.
#[async_trait]
pub trait Environment: Send + Sync {
    fn screen(&self) -> ScreenMetrics;
    fn locale(&self) -> String;
    fn time_zone(&self) -> String;
    fn user_agent(&self) -> String;
    fn core_count(&self) -> u32;

    /// Best-effort position read, accepting a cached fix up to `max_age` old.
    ///
    /// Returns raw `(latitude, longitude)`; `None` when the capability is
    /// missing, permission is denied, or no fix is available.
    async fn request_location(&self, max_age: Duration) -> Option<(f64, f64)>;
}

/// Read-only view of the host's shared display state.
pub trait HostState: Send + Sync {
    fn dial(&self) -> String;
    fn numerals(&self) -> String;
    fn city(&self) -> Option<String>;
    fn country(&self) -> Option<String>;
    /// Text of the host's seasonal banner element, if it exists.
    fn banner_text(&self) -> Option<String>;
}

/// SHA-256 primitive. `None` means the host has no digest available.
pub trait Digest: Send + Sync {
    fn sha256(&self, data: &[u8]) -> Option<[u8; 32]>;
}

/// [`Digest`] backed by `ring`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RingDigest;

impl Digest for RingDigest {
    fn sha256(&self, data: &[u8]) -> Option<[u8; 32]> {
        let d = digest::digest(&digest::SHA256, data);
        d.as_ref().try_into().ok()
    }
}

/// Fixed environment, for hosts that know their signals up front (and tests).
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    pub screen: ScreenMetrics,
    pub locale: String,
    pub time_zone: String,
    pub user_agent: String,
    pub core_count: u32,
    pub location: Option<(f64, f64)>,
}

#[async_trait]
impl Environment for StaticEnvironment {
    fn screen(&self) -> ScreenMetrics {
        self.screen
    }

    fn locale(&self) -> String {
        self.locale.clone()
    }

    fn time_zone(&self) -> String {
        self.time_zone.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn core_count(&self) -> u32 {
        self.core_count
    }

    async fn request_location(&self, _max_age: Duration) -> Option<(f64, f64)> {
        self.location
    }
}

/// Fixed host state.
#[derive(Debug, Clone, Default)]
pub struct StaticHostState {
    pub dial: String,
    pub numerals: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub banner: Option<String>,
}

impl HostState for StaticHostState {
    fn dial(&self) -> String {
        self.dial.clone()
    }

    fn numerals(&self) -> String {
        self.numerals.clone()
    }

    fn city(&self) -> Option<String> {
        self.city.clone()
    }

    fn country(&self) -> Option<String> {
        self.country.clone()
    }

    fn banner_text(&self) -> Option<String> {
        self.banner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_digest_matches_known_vector() {
        let out = RingDigest.sha256(b"abc").unwrap();
        assert_eq!(out[0], 0xba);
        assert_eq!(out[1], 0x78);
        assert_eq!(out[31], 0xad);
    }

    #[tokio::test]
    async fn static_environment_reports_configured_location() {
        let env = StaticEnvironment {
            screen: ScreenMetrics {
                width: 390,
                height: 844,
                color_depth: 24,
            },
            locale: "en-GB".into(),
            time_zone: "Europe/London".into(),
            user_agent: "Mozilla/5.0 (iPhone)".into(),
            core_count: 6,
            location: Some((51.5, -0.1)),
        };
        assert_eq!(
            env.request_location(Duration::from_secs(300)).await,
            Some((51.5, -0.1))
        );
        assert_eq!(env.screen().width, 390);
    }
}
