//! # Task System Core Traits
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method consumes it on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread
//! 5. The result can chain follow-up tasks, which are published in turn
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - A task only touches the data it captured when it was created

/// A unit of work executed on a background worker.
///
/// Tasks own everything they need. Chunk tasks hold an `Arc<Chunk>` and never
/// reach back into the world's chunk map.
pub trait Task: Send {
    /// Performs the work and returns a result for the main thread.
    fn process(self: Box<Self>) -> Box<dyn TaskResult>;
}

/// The main-thread half of a completed task.
///
/// Keep it cheap: it runs inside the frame.
pub trait TaskResult: Send {
    /// Consumes the result and returns follow-up tasks to publish (possibly none).
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>>;
}

/// A result that carries no main-thread work.
pub struct EmptyResult;

impl TaskResult for EmptyResult {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        Vec::new()
    }
}

/// Adapts any closure into a fire-and-forget task.
pub struct ClosureTask<F>(pub F);

impl<F> Task for ClosureTask<F>
where
    F: FnOnce() + Send,
{
    fn process(self: Box<Self>) -> Box<dyn TaskResult> {
        let ClosureTask(work) = *self;
        work();
        Box::new(EmptyResult)
    }
}
