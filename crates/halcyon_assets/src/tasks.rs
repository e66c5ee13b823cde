use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::future::{AbortHandle, abortable};
use futures::task::LocalSpawnExt;

/// Cooperative executor for in-flight loads, polled once per frame.
///
/// Tasks never run on their own; they only make progress inside
/// [`poll`](Self::poll), which keeps every continuation on the frame thread.
pub struct LoadTasks {
    pool: LocalPool,
    tasks: Vec<(AbortHandle, Rc<Cell<bool>>)>,
}

impl Default for LoadTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTasks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: LocalPool::new(),
            tasks: Vec::new(),
        }
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let (task, handle) = abortable(task);
        let done = Rc::new(Cell::new(false));
        let finished = Rc::clone(&done);
        let spawned = self.pool.spawner().spawn_local(async move {
            // Aborted tasks resolve to `Err(Aborted)` and post nothing.
            let _ = task.await;
            finished.set(true);
        });
        match spawned {
            Ok(()) => self.tasks.push((handle, done)),
            Err(e) => log::error!("Failed to spawn load task: {e}"),
        }
    }

    /// Runs every task that can make progress without blocking.
    pub fn poll(&mut self) {
        self.pool.run_until_stalled();
        self.tasks.retain(|(_, done)| !done.get());
    }

    /// Cancels all in-flight tasks and drops them.
    pub fn abort_all(&mut self) {
        for (handle, _) in self.tasks.drain(..) {
            handle.abort();
        }
        self.pool.run_until_stalled();
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

impl std::fmt::Debug for LoadTasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadTasks").field("in_flight", &self.tasks.len()).finish()
    }
}
