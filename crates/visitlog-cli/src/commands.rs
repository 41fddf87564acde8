use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};
use visitlog_core::{RingDigest, StaticHostState, TelemetryConfig, classify, derive_fingerprint};
use visitlog_session::{Capabilities, SessionController, Visibility};
use visitlog_sync::{RemoteWriter, RestTransport};

use crate::cli::{HostArgs, SignalArgs, StoreArgs};

/// Print the fingerprint and profile as JSON on stdout.
pub fn fingerprint(signals: SignalArgs) -> anyhow::Result<()> {
    let env = signals.into_environment();
    let fingerprint = derive_fingerprint(&env, &RingDigest)?;
    let out = json!({
        "fingerprint": fingerprint,
        "profile": classify(&env),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Run one session against the REST store until Ctrl-C.
///
/// Ctrl-C plays the part of the page being hidden: the final duration goes
/// out as a beacon, which is then flushed with a bounded wait.
pub async fn run(signals: SignalArgs, host: HostArgs, store: StoreArgs) -> anyhow::Result<()> {
    let config = TelemetryConfig {
        base_url: store.url,
        api_key: store.key,
        ..TelemetryConfig::default()
    };
    let transport =
        Arc::new(RestTransport::from_config(&config).context("building HTTP client")?);
    let caps = Capabilities {
        environment: Arc::new(signals.into_environment()),
        host: Arc::new(StaticHostState::from(host)),
        digest: Arc::new(RingDigest),
    };
    let controller = Arc::new(SessionController::new(
        caps,
        RemoteWriter::new(transport.clone()),
        config,
    ));

    let runner = tokio::spawn(Arc::clone(&controller).run());
    tokio::signal::ctrl_c().await.context("listening for Ctrl-C")?;

    controller.on_visibility_change(Visibility::Hidden);
    runner.abort();

    if !transport
        .flush(Duration::from_secs(store.flush_timeout))
        .await
    {
        warn!("final beacon still in flight at shutdown");
    }
    info!(
        phase = ?controller.phase(),
        session_id = ?controller.session_id(),
        duration_s = controller.elapsed_secs(),
        "session ended"
    );
    Ok(())
}
