//! Outbound notification port.

use deepdelve_shared::CommitNotice;

/// Fan-out for reconciled delegate batches. Publishing never fails the
/// mutation that produced the notice.
#[cfg_attr(test, mockall::automock)]
pub trait CommitPublisher: Send + Sync {
    fn publish(&self, notice: CommitNotice);
}
