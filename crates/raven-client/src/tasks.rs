//! Background requests tied to the lifetime of a UI component

use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Owns the tasks a component spawned; dropping the scope aborts them.
///
/// A task that is aborted never runs its continuation, so callbacks such as
/// a refresh after a like toggle cannot fire for a component that is gone.
#[derive(Debug)]
pub struct TaskScope {
    runtime: Handle,
    tasks: Vec<JoinHandle<()>>,
}

impl TaskScope {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            tasks: Vec::new(),
        }
    }

    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(self.runtime.spawn(future));
    }

    /// Number of tasks that have not completed yet
    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    pub fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        if self.in_flight() > 0 {
            tracing::debug!("Aborting {} in-flight request(s)", self.in_flight());
        }
        self.abort_all();
    }
}
