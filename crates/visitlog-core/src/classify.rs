//! Environment classification from user-agent and screen width.
//!
//! These are heuristics. Spoofed or unusual user agents misclassify and that
//! is accepted: the labels only feed aggregate analytics.
//!
//! # Priority order
//!
//! Matching is by substring, first match wins:
//!
//! - OS: `iPhone`/`iPad` → iOS, `Android`, `Mac` → macOS, `Win` → Windows, `Linux`
//! - Browser: `Chrome`, `Safari`, `Firefox`
//!
//! iOS user agents contain "like Mac OS X" and Android ones contain "Linux",
//! so the mobile platforms must be checked before the desktop ones.
//! Likewise Chrome advertises "Safari" and must precede it.

use crate::capability::Environment;
use crate::model::{Browser, DeviceClass, EnvironmentProfile, OperatingSystem};

const TABLET_MIN_WIDTH: u32 = 768;
const DESKTOP_MIN_WIDTH: u32 = 1024;

const OS_PATTERNS: &[(&[&str], OperatingSystem)] = &[
    (&["iPhone", "iPad"], OperatingSystem::Ios),
    (&["Android"], OperatingSystem::Android),
    (&["Mac"], OperatingSystem::MacOs),
    (&["Win"], OperatingSystem::Windows),
    (&["Linux"], OperatingSystem::Linux),
];

const BROWSER_PATTERNS: &[(&str, Browser)] = &[
    ("Chrome", Browser::Chrome),
    ("Safari", Browser::Safari),
    ("Firefox", Browser::Firefox),
];

pub fn classify_os(user_agent: &str) -> OperatingSystem {
    OS_PATTERNS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| user_agent.contains(n)))
        .map(|&(_, os)| os)
        .unwrap_or(OperatingSystem::Other)
}

pub fn classify_browser(user_agent: &str) -> Browser {
    BROWSER_PATTERNS
        .iter()
        .find(|(needle, _)| user_agent.contains(needle))
        .map(|&(_, browser)| browser)
        .unwrap_or(Browser::Other)
}

pub fn classify_device(screen_width: u32) -> DeviceClass {
    if screen_width < TABLET_MIN_WIDTH {
        DeviceClass::Mobile
    } else if screen_width < DESKTOP_MIN_WIDTH {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

/// Build the full profile from the host's static signals.
pub fn classify(env: &dyn Environment) -> EnvironmentProfile {
    let screen = env.screen();
    let ua = env.user_agent();
    EnvironmentProfile {
        device: classify_device(screen.width),
        os: classify_os(&ua),
        browser: classify_browser(&ua),
        screen_width: screen.width,
        screen_height: screen.height,
    }
}
