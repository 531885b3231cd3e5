use super::*;

/// What a pending timer will do when it fires. Timer-driven sequences
/// (slide auto-advance, resize debounce, the simulated form round trip)
/// are explicit state machine steps rather than stored callbacks, so
/// cancellation and reset stay inspectable from tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerTask {
    SlideAdvance,
    ResizeSettled,
    BorderFlashClear { field: NodeId },
    SubmitDeliver { form: NodeId },
    SubmitRestore { form: NodeId },
    HashScroll,
}

#[derive(Debug, Clone)]
pub(crate) struct Scheduled {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) interval_ms: Option<i64>,
    pub(crate) task: TimerTask,
}

/// A scheduled timer as seen from tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub interval_ms: Option<i64>,
}

#[derive(Debug)]
pub(crate) struct Scheduler {
    pub(crate) queue: Vec<Scheduled>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    next_timer_id: i64,
    next_task_order: i64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }
}

impl Scheduler {
    pub(crate) fn schedule(&mut self, delay_ms: i64, task: TimerTask) -> i64 {
        self.schedule_inner(delay_ms, None, task)
    }

    pub(crate) fn schedule_interval(&mut self, interval_ms: i64, task: TimerTask) -> i64 {
        self.schedule_inner(interval_ms, Some(interval_ms), task)
    }

    fn schedule_inner(&mut self, delay_ms: i64, interval_ms: Option<i64>, task: TimerTask) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.queue.push(Scheduled {
            id,
            due_at: self.now_ms.saturating_add(delay_ms.max(0)),
            order,
            interval_ms,
            task,
        });
        id
    }

    pub(crate) fn clear(&mut self, timer_id: i64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|task| task.id != timer_id);
        before != self.queue.len()
    }

    pub(crate) fn clear_all(&mut self) -> usize {
        let cleared = self.queue.len();
        self.queue.clear();
        cleared
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.map(|limit| task.due_at <= limit).unwrap_or(true))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    /// Removes and returns the next task due at or before `due_limit`
    /// (or the earliest task overall when `due_limit` is `None`).
    /// An interval task is re-queued under the same timer id before it is
    /// handed back, so clearing that id keeps working mid-flight.
    pub(crate) fn take_next(&mut self, due_limit: Option<i64>) -> Option<Scheduled> {
        let idx = self.next_task_index(due_limit)?;
        let task = self.queue.remove(idx);
        if let Some(interval) = task.interval_ms {
            let order = self.next_task_order;
            self.next_task_order += 1;
            self.queue.push(Scheduled {
                id: task.id,
                due_at: task.due_at.saturating_add(interval.max(1)),
                order,
                interval_ms: task.interval_ms,
                task: task.task,
            });
        }
        Some(task)
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                interval_ms: task.interval_ms,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }
}
