//=========================================================================
// Scheduler
//
// Timed-task collaborator advanced once per non-paused tick.
//
// Application code registers one-shot and recurring tasks against the
// shared handle obtained from the engine; the engine's only contract is
// to call `advance(dt)` each executed tick. Internal bookkeeping beyond
// that contract is deliberately minimal.
//
// Notes:
// Task callbacks run while the scheduler is mutably borrowed, so they
// must not re-borrow the shared handle. A task that needs to affect the
// engine or the scheduler posts through the engine proxy instead.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

//=== External Crates =====================================================

use log::trace;

//=== SchedulerHandle =====================================================

/// Shared, single-threaded handle to the engine's scheduler.
///
/// Valid only between `init()` and the matching teardown; the engine
/// hands out clones and retains ownership of the task bookkeeping.
pub type SchedulerHandle = Rc<RefCell<Scheduler>>;

//=== TaskId ==============================================================

/// Opaque handle identifying a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

//=== Task ================================================================

type TaskFn = Box<dyn FnMut(Duration)>;

struct Task {
    /// Absolute scheduler time at which the task next fires.
    due: Duration,
    /// `Some` for recurring tasks, `None` for one-shots.
    interval: Option<Duration>,
    callback: TaskFn,
}

//=== Scheduler ===========================================================

/// Advances time-dependent tasks once per tick.
pub struct Scheduler {
    tasks: HashMap<TaskId, Task>,
    now: Duration,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            now: Duration::ZERO,
            next_id: 0,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Schedules `callback` to fire once after `delay` of scheduler time.
    ///
    /// The callback receives the delta of the tick on which it fired.
    pub fn schedule_once<F>(&mut self, delay: Duration, callback: F) -> TaskId
    where
        F: FnMut(Duration) + 'static,
    {
        self.insert(delay, None, Box::new(callback))
    }

    /// Schedules `callback` to fire every `interval` of scheduler time,
    /// starting one interval from now.
    pub fn schedule_repeating<F>(&mut self, interval: Duration, callback: F) -> TaskId
    where
        F: FnMut(Duration) + 'static,
    {
        self.insert(interval, Some(interval), Box::new(callback))
    }

    /// Cancels a task. Returns whether it was still registered.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    fn insert(&mut self, delay: Duration, interval: Option<Duration>, callback: TaskFn) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(
            id,
            Task {
                due: self.now + delay,
                interval,
                callback,
            },
        );
        trace!(target: "engine::scheduler", "Scheduled task {:?} (+{:?})", id, delay);
        id
    }

    //--- Advancing ---------------------------------------------------------

    /// Advances scheduler time by `dt` and runs every task that came due.
    ///
    /// One-shot tasks are removed after firing; recurring tasks are
    /// rescheduled one interval after their previous due time. A task
    /// fires at most once per advance, even when `dt` spans several of
    /// its intervals.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
        let now = self.now;

        let due: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(id, _)| *id)
            .collect();

        for id in due {
            // The task may have been cancelled by an earlier callback.
            let Some(mut task) = self.tasks.remove(&id) else {
                continue;
            };
            (task.callback)(dt);

            if let Some(interval) = task.interval {
                task.due += interval;
                if task.due <= now {
                    task.due = now + interval;
                }
                self.tasks.insert(id, task);
            }
        }
    }

    //--- Queries --------------------------------------------------------------

    /// Accumulated scheduler time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every registered task without running it.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
