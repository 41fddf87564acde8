use tokio::task::JoinHandle;

/// Handle to the duration heartbeat.
///
/// Dropping the handle detaches the task; it then runs until the session
/// leaves the `Open` phase.
#[derive(Debug)]
pub struct PeriodicHandle {
    task: JoinHandle<()>,
}

impl PeriodicHandle {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stop the heartbeat. An update already in flight is abandoned.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the heartbeat to stop, either by cancellation or because the
    /// session closed.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}
