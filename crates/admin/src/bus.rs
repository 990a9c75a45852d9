use catalog::resource::ResourceKind;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Created,
    Updated,
    Deleted,
}

/// "resource `id` of `kind` changed", published by a panel after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub kind: ResourceKind,
    pub op: ChangeOp,
    /// Raw server id; `None` when the server response did not tell us.
    pub id: Option<u64>,
}

/// Fan-out of [`Change`] events to any number of views.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<Change>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }

    pub fn publish(&self, change: Change) {
        tracing::debug!(kind = %change.kind, op = ?change.op, id = ?change.id, "change published");
        // nobody listening is fine
        self.tx.send(change).ok();
    }
}

/// Drains everything queued on `rx` without waiting.
pub fn drain(rx: &mut broadcast::Receiver<Change>) -> Vec<Change> {
    let mut changes = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(change) => changes.push(change),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "change subscriber lagged");
            }
            Err(_) => break,
        }
    }
    changes
}
