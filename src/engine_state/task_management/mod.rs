//! # Task Management System
//!
//! A fixed pool of OS worker threads fed from the main thread.
//!
//! ## Architecture Overview
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work executed on a worker
//! - `TaskResult`: The main-thread half of a finished task, which can chain more tasks
//! - `TaskChannel`: Communication channel between the main thread and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()` (never blocks)
//! 2. The manager hands tasks to idle workers round-robin, queueing the rest
//! 3. Workers process tasks and send back results
//! 4. Results are handled on the main thread in `process_completed_tasks()`
//! 5. Follow-up tasks returned by results are published like any other
//!
//! ## Shutdown
//! `shutdown()` closes every task channel and joins every worker. It runs from
//! `Drop` as well, so owners that free data reachable from tasks must call it
//! (or drop the manager) first. Tasks still waiting in the queue are discarded;
//! tasks already handed to a worker run to completion.
//!
//! ## Example Usage
//! ```rust
//! use voxel_sandbox::engine_state::task_management::TaskManager;
//!
//! let mut task_manager = TaskManager::new(2);
//! task_manager.spawn(|| println!("hello from a worker"));
//!
//! // In the game loop:
//! task_manager.process_completed_tasks();
//! task_manager.process_queued_tasks();
//!
//! // At teardown:
//! task_manager.wait_idle();
//! task_manager.shutdown();
//! ```

pub mod task;

use log::{debug, info};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use task::{ClosureTask, Task, TaskResult};

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker; `None` once shut down
/// - `result_receiver`: Receives task results from worker
/// - `num_tasks_in_flight`: Tasks handed to this worker whose result has not been handled
/// - `worker`: Handle to the worker thread, joined on shutdown
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Option<Sender<Box<dyn Task>>>,
    result_receiver: Receiver<Box<dyn TaskResult>>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Must be driven from a single (main) thread.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Kept at 1 so that a busy worker never hoards queued work another worker could take.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with `num_workers` OS threads.
    ///
    /// # Panics
    /// Panics if the operating system refuses to spawn a thread.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Starting {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("task-worker-{worker_index}"))
                .spawn(task_closure)
                .unwrap_or_else(|err| panic!("failed to spawn task worker: {err}"));

            channels.push(TaskChannel {
                task_sender: Some(task_tx),
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker: Some(worker),
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of worker threads owned by this manager.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks waiting for a free worker.
    pub fn queued_len(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Tasks handed to workers whose results have not been handled yet.
    pub fn in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    /// `true` when nothing is queued and nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// Returns the task back if the worker is gone so it can be requeued.
    fn try_send_task(&mut self, task: Box<dyn Task>, channel_idx: usize) -> Result<(), Box<dyn Task>> {
        let channel = &mut self.channels[channel_idx];
        let Some(sender) = channel.task_sender.as_ref() else {
            return Err(task);
        };
        match sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(err) => Err(err.0),
        }
    }

    /// Finds a worker channel that can accept a new task, round-robin from the last used one.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&idx| {
                let channel = &self.channels[idx];
                channel.task_sender.is_some() && channel.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Publishes a new task for execution.
    ///
    /// Returns `true` if the task went straight to a worker and `false` if it was
    /// queued. Never blocks.
    pub fn publish_task(&mut self, task: Box<dyn Task>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Publishes a closure as a fire-and-forget task.
    pub fn spawn<F>(&mut self, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.publish_task(Box::new(ClosureTask(work)))
    }

    /// Hands queued tasks to idle workers, oldest first, until the queue is
    /// empty or every worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Handles every result that has arrived so far, without blocking.
    ///
    /// Follow-up tasks returned by the results are published before returning.
    pub fn process_completed_tasks(&mut self) {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }
        self.handle_results(results);
    }

    fn handle_results(&mut self, results: Vec<Box<dyn TaskResult>>) {
        for result in results {
            for task in result.handle_result() {
                self.publish_task(task);
            }
        }
    }

    /// Blocks until the queue is drained and every in-flight task, including
    /// chained follow-ups, has been handled.
    pub fn wait_idle(&mut self) {
        loop {
            self.process_completed_tasks();
            self.process_queued_tasks();
            if self.is_idle() {
                return;
            }

            let Some(channel_idx) = self
                .channels
                .iter()
                .position(|c| c.num_tasks_in_flight > 0)
            else {
                // Work is queued but no worker can take it.
                debug!(
                    "wait_idle abandoning {} queued tasks with no live workers",
                    self.queued_tasks.len()
                );
                return;
            };

            let channel = &mut self.channels[channel_idx];
            match channel.result_receiver.recv() {
                Ok(result) => {
                    channel.num_tasks_in_flight -= 1;
                    self.handle_results(vec![result]);
                }
                Err(_) => {
                    // The worker died; its in-flight tasks will never report back.
                    channel.num_tasks_in_flight = 0;
                    channel.task_sender = None;
                }
            }
        }
    }

    /// Closes every channel and joins every worker thread.
    ///
    /// Tasks already running finish first. Idempotent.
    pub fn shutdown(&mut self) {
        let discarded = self.queued_tasks.len();
        self.queued_tasks.clear();

        for channel in &mut self.channels {
            channel.task_sender = None;
        }

        let mut joined = 0;
        for channel in &mut self.channels {
            if let Some(worker) = channel.worker.take() {
                if worker.join().is_err() {
                    log::error!("a task worker panicked before shutdown");
                }
                joined += 1;
            }
            channel.num_tasks_in_flight = 0;
        }

        if joined > 0 {
            info!("Task workers joined ({joined} threads, {discarded} queued tasks discarded)");
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Chained {
        counter: Arc<AtomicUsize>,
        remaining: usize,
    }

    struct ChainedResult {
        counter: Arc<AtomicUsize>,
        remaining: usize,
    }

    impl Task for Chained {
        fn process(self: Box<Self>) -> Box<dyn TaskResult> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            Box::new(ChainedResult {
                counter: self.counter,
                remaining: self.remaining,
            })
        }
    }

    impl TaskResult for ChainedResult {
        fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
            if self.remaining == 0 {
                return Vec::new();
            }
            vec![Box::new(Chained {
                counter: self.counter,
                remaining: self.remaining - 1,
            })]
        }
    }

    #[test]
    fn spawned_closures_all_run() {
        let mut manager = TaskManager::new(3);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..50 {
            let counter = counter.clone();
            manager.spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        manager.wait_idle();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
        assert!(manager.is_idle());
    }

    #[test]
    fn publishing_beyond_capacity_queues() {
        let mut manager = TaskManager::new(1);
        let (release_tx, release_rx) = channel::<()>();
        assert!(manager.spawn(move || {
            let _ = release_rx.recv();
        }));
        assert!(!manager.spawn(|| {}));
        assert_eq!(manager.queued_len(), 1);
        release_tx.send(()).unwrap();
        manager.wait_idle();
        assert_eq!(manager.queued_len(), 0);
    }

    #[test]
    fn chained_results_are_followed() {
        let mut manager = TaskManager::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        manager.publish_task(Box::new(Chained {
            counter: counter.clone(),
            remaining: 4,
        }));
        manager.wait_idle();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn shutdown_joins_running_work() {
        let mut manager = TaskManager::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let counter = counter.clone();
            manager.spawn(move || {
                thread::sleep(std::time::Duration::from_millis(20));
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        manager.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!manager.spawn(|| {}));
        manager.shutdown();
    }

    #[test]
    fn zero_workers_only_queue() {
        let mut manager = TaskManager::new(0);
        assert!(!manager.spawn(|| {}));
        manager.process_queued_tasks();
        assert_eq!(manager.queued_len(), 1);
        manager.wait_idle();
        assert_eq!(manager.worker_count(), 0);
    }
}
