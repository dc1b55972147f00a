use crate::domain::DockingJob;
use crate::ports::outbound::WorkQueue;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO work queue held in memory.
///
/// Jobs are marked `assigned` when handed out and never returned.
#[derive(Default)]
pub struct InMemoryWorkQueue {
    pending: Mutex<VecDeque<DockingJob>>,
}

impl InMemoryWorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: impl IntoIterator<Item = DockingJob>) -> Self {
        let queue = Self::new();
        queue.extend(jobs);
        queue
    }

    pub fn push(&self, job: DockingJob) {
        self.pending.lock().push_back(job);
    }

    pub fn extend(&self, jobs: impl IntoIterator<Item = DockingJob>) {
        self.pending.lock().extend(jobs);
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl WorkQueue for InMemoryWorkQueue {
    fn take_pending(&self, limit: usize) -> Vec<DockingJob> {
        let mut pending = self.pending.lock();
        let n = limit.min(pending.len());
        pending
            .drain(..n)
            .map(|mut job| {
                job.assigned = true;
                job
            })
            .collect()
    }
}
