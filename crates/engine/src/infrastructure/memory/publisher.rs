//! Commit notices over a tokio broadcast channel.

use deepdelve_shared::CommitNotice;
use tokio::sync::broadcast;

use crate::infrastructure::ports::CommitPublisher;

pub struct BroadcastPublisher {
    sender: broadcast::Sender<CommitNotice>,
}

impl BroadcastPublisher {
    /// Publisher plus a first subscriber.
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<CommitNotice>) {
        let (sender, receiver) = broadcast::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CommitNotice> {
        self.sender.subscribe()
    }
}

impl CommitPublisher for BroadcastPublisher {
    fn publish(&self, notice: CommitNotice) {
        let batch_id = notice.batch_id;
        // An error only means nobody is listening right now.
        if self.sender.send(notice).is_err() {
            tracing::debug!(batch_id = %batch_id, "Commit notice had no subscribers");
        }
    }
}
