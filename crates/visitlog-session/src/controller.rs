//! Session lifecycle controller.
//!
//! ```text
//! Idle ──open()──▶ Opening ──id returned──▶ Open ──Hidden──▶ Closed
//!                     │
//!                     └── no digest / write failed / no id / dropped ──▶ Disabled
//! ```
//!
//! The controller owns the session id (set once, by the open response) and
//! the start instant (set once, at construction). Nothing it does returns an
//! error or panics into the host; every failure ends in "do nothing further".

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use visitlog_core::{
    Digest, Environment, HostState, LocationSample, SessionId, SessionRecord, SessionUpdate,
    TelemetryConfig, classify, derive_fingerprint,
};
use visitlog_sync::RemoteWriter;

use crate::periodic::PeriodicHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Opening,
    Open,
    Closed,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Everything the controller reads from its host.
#[derive(Clone)]
pub struct Capabilities {
    pub environment: Arc<dyn Environment>,
    pub host: Arc<dyn HostState>,
    pub digest: Arc<dyn Digest>,
}

pub struct SessionController {
    caps: Capabilities,
    writer: RemoteWriter,
    config: TelemetryConfig,
    started: Instant,
    phase: Mutex<Phase>,
    session_id: OnceLock<SessionId>,
}

impl SessionController {
    /// Create a controller for one page load. The session clock starts now.
    pub fn new(caps: Capabilities, writer: RemoteWriter, config: TelemetryConfig) -> Self {
        Self {
            caps,
            writer,
            config,
            started: Instant::now(),
            phase: Mutex::new(Phase::Idle),
            session_id: OnceLock::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.lock_phase()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.get()
    }

    /// Whole seconds since construction, rounded to nearest.
    pub fn elapsed_secs(&self) -> u64 {
        let ms = self.started.elapsed().as_millis();
        ((ms + 500) / 1000) as u64
    }

    /// Full page-load program: wait out the start delay, open the session,
    /// and start the heartbeat if a session id came back.
    pub async fn run(self: Arc<Self>) -> Option<PeriodicHandle> {
        time::sleep(self.config.start_delay).await;
        self.open().await;
        self.spawn_periodic()
    }

    /// Open the remote session record. Only the first call does anything;
    /// later calls return the current phase.
    pub async fn open(&self) -> Phase {
        {
            let mut phase = self.lock_phase();
            if *phase != Phase::Idle {
                return *phase;
            }
            *phase = Phase::Opening;
        }
        let _settle = OpeningGuard(&self.phase);

        let fingerprint =
            match derive_fingerprint(self.caps.environment.as_ref(), self.caps.digest.as_ref()) {
                Ok(fp) => fp,
                Err(e) => {
                    warn!(error = %e, "telemetry disabled");
                    return self.set_phase(Phase::Disabled);
                }
            };
        let profile = classify(self.caps.environment.as_ref());
        let host = self.caps.host.as_ref();
        let seasonal = self.config.is_seasonal(host.banner_text().as_deref());
        let location = self.read_location().await;

        let record = SessionRecord {
            fingerprint,
            city: host.city().filter(|s| !s.is_empty()),
            country: host.country().filter(|s| !s.is_empty()),
            latitude: None,
            longitude: None,
            profile,
            dial: host.dial(),
            numerals: host.numerals(),
            seasonal,
            duration_secs: 0,
        }
        .with_location(location);

        let rows = self
            .writer
            .send_returning(&self.config.sessions_table, &record)
            .await;
        match rows.as_ref().and_then(SessionId::from_rows) {
            Some(id) => {
                info!(session_id = %id, visitor = %record.fingerprint, "session opened");
                let _ = self.session_id.set(id);
                self.set_phase(Phase::Open)
            }
            None => {
                info!("no session id returned, telemetry disabled for this load");
                self.set_phase(Phase::Disabled)
            }
        }
    }

    /// Start the heartbeat. Returns `None` unless the session is open and a
    /// tokio runtime is available to run it.
    ///
    /// Ticks are aligned to the controller's start instant, so the first one
    /// reports one full period. The task stops on its own once the session
    /// leaves `Open`.
    pub fn spawn_periodic(self: &Arc<Self>) -> Option<PeriodicHandle> {
        if self.phase() != Phase::Open {
            return None;
        }
        let Ok(runtime) = Handle::try_current() else {
            debug!("no async runtime, heartbeat not started");
            return None;
        };
        let controller = Arc::clone(self);
        let period = self.config.update_period;
        let first = self.started + period;

        let task = runtime.spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if controller.phase() != Phase::Open {
                    break;
                }
                controller.tick().await;
            }
            debug!("heartbeat stopped");
        });
        Some(PeriodicHandle::new(task))
    }

    /// Send one duration update. Does nothing unless the session is open.
    pub async fn tick(&self) {
        let Some(update) = self.update_if_open() else {
            return;
        };
        debug!(duration_s = update.duration_secs, "heartbeat");
        self.writer.send(&self.config.updates_table, &update).await;
    }

    /// React to a host visibility change.
    ///
    /// The first `Hidden` while open closes the session and sends the final
    /// duration through the beacon. Becoming visible again does not reopen
    /// or resume anything.
    pub fn on_visibility_change(&self, visibility: Visibility) {
        if visibility != Visibility::Hidden {
            return;
        }
        {
            let mut phase = self.lock_phase();
            if *phase != Phase::Open {
                return;
            }
            *phase = Phase::Closed;
        }
        let Some(id) = self.session_id.get() else {
            return;
        };
        let update = SessionUpdate {
            session_id: id.clone(),
            duration_secs: self.elapsed_secs(),
            dial: self.caps.host.dial(),
        };
        info!(session_id = %id, duration_s = update.duration_secs, "session closed");
        self.writer.send_beacon(&self.config.updates_table, &update);
    }

    fn update_if_open(&self) -> Option<SessionUpdate> {
        if self.phase() != Phase::Open {
            return None;
        }
        let id = self.session_id.get()?;
        Some(SessionUpdate {
            session_id: id.clone(),
            duration_secs: self.elapsed_secs(),
            dial: self.caps.host.dial(),
        })
    }

    async fn read_location(&self) -> Option<LocationSample> {
        let request = self
            .caps
            .environment
            .request_location(self.config.location_max_age);
        let raw = match self.config.location_timeout {
            Some(limit) => match time::timeout(limit, request).await {
                Ok(raw) => raw,
                Err(_) => {
                    debug!("location request timed out");
                    None
                }
            },
            None => request.await,
        };
        raw.filter(|(lat, lon)| lat.is_finite() && lon.is_finite())
            .map(|(lat, lon)| LocationSample::rounded(lat, lon))
    }

    fn set_phase(&self, next: Phase) -> Phase {
        *self.lock_phase() = next;
        next
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles an `open()` that was dropped mid-flight as `Disabled`.
struct OpeningGuard<'a>(&'a Mutex<Phase>);

impl Drop for OpeningGuard<'_> {
    fn drop(&mut self) {
        let mut phase = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase == Phase::Opening {
            debug!("session open abandoned");
            *phase = Phase::Disabled;
        }
    }
}
