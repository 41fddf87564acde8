//! Core types, host capabilities, fingerprinting and environment classification.

pub mod capability;
pub mod classify;
pub mod config;
pub mod fingerprint;
pub mod model;

pub use capability::{
    Digest, Environment, HostState, RingDigest, ScreenMetrics, StaticEnvironment,
    StaticHostState,
};
pub use classify::{classify, classify_browser, classify_device, classify_os};
pub use config::TelemetryConfig;
pub use fingerprint::{FingerprintError, derive_fingerprint};
pub use model::{
    Browser, DeviceClass, EnvironmentProfile, LocationSample, OperatingSystem, SessionId,
    SessionRecord, SessionUpdate, VisitorFingerprint,
};
