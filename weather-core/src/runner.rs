//! Concurrent execution of a set of named tasks with an all-or-nothing result.
//!
//! Every task in a [`TaskGroup`] is spawned onto the tokio runtime at once and
//! runs to completion on its own; a failing task never cancels its siblings.
//! [`TaskGroup::join`] waits for all of them and only then decides the outcome:
//! success if every task succeeded, otherwise a [`RunError`] listing each
//! failure in registration order.

use chrono::{DateTime, Utc};
use std::{fmt, future::Future, pin::Pin, time::Duration};
use tokio::time::Instant;
use tracing::debug;

use crate::{Result, WeatherError};

type TaskFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Lifecycle of a single task: `Pending -> Running -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct PendingTask<T> {
    name: String,
    future: TaskFuture<T>,
}

/// A set of named tasks that are launched together and joined together.
pub struct TaskGroup<T> {
    tasks: Vec<PendingTask<T>>,
}

impl<T> Default for TaskGroup<T> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<T> fmt::Debug for TaskGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGroup")
            .field("tasks", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> TaskGroup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name.as_str())
    }
}

impl<T: Send + 'static> TaskGroup<T> {
    /// Register a task. Nothing runs until [`TaskGroup::join`].
    pub fn add<F>(&mut self, name: impl Into<String>, future: F) -> &mut Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let name = name.into();
        debug!(task = %name, state = %TaskState::Pending, "task registered");
        self.tasks.push(PendingTask { name, future: Box::pin(future) });
        self
    }

    /// Launch every task concurrently and wait until all have finished.
    pub async fn join(self) -> std::result::Result<RunSummary<T>, RunError<T>> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let mut handles = Vec::with_capacity(self.tasks.len());
        for PendingTask { name, future } in self.tasks {
            let handle = tokio::spawn(async move {
                let result = future.await;
                (result, clock.elapsed())
            });
            debug!(task = %name, state = %TaskState::Running, "task launched");
            handles.push((name, handle));
        }

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for (name, handle) in handles {
            let (result, elapsed) = match handle.await {
                Ok(finished) => finished,
                Err(_) => (
                    Err(WeatherError::TaskPanicked { task: name.clone() }),
                    clock.elapsed(),
                ),
            };

            match result {
                Ok(value) => {
                    debug!(task = %name, state = %TaskState::Succeeded, ?elapsed, "task finished");
                    outcomes.push(TaskOutcome { name, elapsed, value });
                }
                Err(error) => {
                    debug!(task = %name, state = %TaskState::Failed, ?elapsed, %error, "task finished");
                    failures.push(TaskFailure { task: name, elapsed, error });
                }
            }
        }

        let elapsed = clock.elapsed();
        if failures.is_empty() {
            Ok(RunSummary { started_at, finished_at: Utc::now(), elapsed, outcomes })
        } else {
            Err(RunError { elapsed, succeeded: outcomes, failures })
        }
    }
}

/// A task that ran to completion successfully.
#[derive(Debug)]
pub struct TaskOutcome<T> {
    pub name: String,
    /// Time from the start of the run until this task finished.
    pub elapsed: Duration,
    pub value: T,
}

/// Result of a run in which every task succeeded.
#[derive(Debug)]
pub struct RunSummary<T> {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// In registration order.
    pub outcomes: Vec<TaskOutcome<T>>,
}

impl<T> RunSummary<T> {
    pub fn outcome(&self, name: &str) -> Option<&TaskOutcome<T>> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

#[derive(Debug)]
pub struct TaskFailure {
    pub task: String,
    pub elapsed: Duration,
    pub error: WeatherError,
}

/// A run in which at least one task failed.
///
/// Holds every failure, in the order the tasks were registered, so the
/// reported error does not depend on which task the scheduler finished first.
/// Tasks that did succeed keep their values.
#[derive(Debug)]
pub struct RunError<T> {
    pub elapsed: Duration,
    /// In registration order.
    pub succeeded: Vec<TaskOutcome<T>>,
    pub failures: Vec<TaskFailure>,
}

impl<T> RunError<T> {
    pub fn failed_tasks(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.task.as_str())
    }

    pub fn succeeded_tasks(&self) -> impl Iterator<Item = &str> {
        self.succeeded.iter().map(|o| o.name.as_str())
    }

    pub fn outcome(&self, name: &str) -> Option<&TaskOutcome<T>> {
        self.succeeded.iter().find(|o| o.name == name)
    }

    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        if self.failed_tasks().any(|t| t == task) {
            Some(TaskState::Failed)
        } else if self.succeeded_tasks().any(|t| t == task) {
            Some(TaskState::Succeeded)
        } else {
            None
        }
    }
}

impl<T> fmt::Display for RunError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.failures.len() + self.succeeded.len();
        write!(f, "{} of {total} task(s) failed: ", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.task, failure.error)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> std::error::Error for RunError<T> {}
