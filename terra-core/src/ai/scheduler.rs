//! The per-mob AI task scheduler (§4.5 "Tick algorithm").

use super::task::AiTask;

struct Entry {
    priority: i32,
    task: Box<dyn AiTask>,
    running: bool,
}

/// Runs a prioritized set of [`AiTask`]s on a single mob within one tick
/// (§4.5).
#[derive(Default)]
pub struct AiScheduler {
    tasks: Vec<Entry>,
    tick_counter: u32,
}

impl AiScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a task at the given priority (lower = stronger, §3
    /// "`AITask`"), keeping tasks sorted by ascending priority.
    pub fn add_task(&mut self, priority: i32, task: Box<dyn AiTask>) {
        self.tasks.push(Entry {
            priority,
            task,
            running: false,
        });
        self.tasks.sort_by_key(|e| e.priority);
    }

    /// Whether the task at `index` (in priority-sorted order) is currently
    /// running, for tests and observability.
    #[must_use]
    pub fn is_running(&self, index: usize) -> bool {
        self.tasks.get(index).is_some_and(|e| e.running)
    }

    /// The number of attached tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advances the scheduler by one tick (§4.5 "Tick algorithm"). Every
    /// 3rd call is a full evaluation that may stop running tasks and start
    /// new ones; other calls only stop tasks whose `should_continue()` has
    /// gone false. `on_tick()` runs on every still-running task afterward.
    pub fn tick(&mut self) {
        self.tick_counter = self.tick_counter.wrapping_add(1);
        if self.tick_counter % 3 == 0 {
            self.full_evaluate();
        } else {
            self.partial_evaluate();
        }

        for entry in &mut self.tasks {
            if entry.running {
                entry.task.on_tick();
            }
        }
    }

    fn partial_evaluate(&mut self) {
        for entry in &mut self.tasks {
            if entry.running && !entry.task.should_continue() {
                entry.task.on_end();
                entry.running = false;
            }
        }
    }

    fn full_evaluate(&mut self) {
        let n = self.tasks.len();
        let mutex_bits: Vec<u32> = self.tasks.iter().map(|e| e.task.mutex_bits()).collect();
        let priorities: Vec<i32> = self.tasks.iter().map(|e| e.priority).collect();

        // Stop any running task that's no longer compatible with the other
        // running tasks, or whose `should_continue()` has gone false.
        for i in 0..n {
            if !self.tasks[i].running {
                continue;
            }
            let mut others_mask = 0u32;
            for (j, &bits) in mutex_bits.iter().enumerate() {
                if j != i && self.tasks[j].running {
                    others_mask |= bits;
                }
            }
            let compatible = mutex_bits[i] & others_mask == 0;
            let continues = self.tasks[i].task.should_continue();
            if !(compatible && continues) {
                self.tasks[i].task.on_end();
                self.tasks[i].running = false;
            }
        }

        // Try to start not-running tasks in priority order, preempting
        // lower-priority interruptible tasks that conflict.
        for i in 0..n {
            if self.tasks[i].running {
                continue;
            }
            let bits = mutex_bits[i];
            let priority = priorities[i];

            let mut to_preempt = Vec::new();
            let mut blocked = false;
            for j in 0..n {
                if j == i || !self.tasks[j].running {
                    continue;
                }
                if mutex_bits[j] & bits == 0 {
                    continue;
                }
                if priority < priorities[j] && self.tasks[j].task.is_interruptible() {
                    to_preempt.push(j);
                } else {
                    blocked = true;
                    break;
                }
            }
            if blocked {
                continue;
            }
            if !self.tasks[i].task.should_start() {
                continue;
            }

            for &j in &to_preempt {
                self.tasks[j].task.on_end();
                self.tasks[j].running = false;
            }
            self.tasks[i].task.on_start();
            self.tasks[i].running = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::task::{MUTEX_LOOK, MUTEX_MOVE};
    use super::*;

    struct AlwaysWants {
        mutex: u32,
        interruptible: bool,
        starts: u32,
        ends: u32,
        ticks: u32,
    }

    impl AlwaysWants {
        fn new(mutex: u32, interruptible: bool) -> Self {
            Self {
                mutex,
                interruptible,
                starts: 0,
                ends: 0,
                ticks: 0,
            }
        }
    }

    impl AiTask for AlwaysWants {
        fn mutex_bits(&self) -> u32 {
            self.mutex
        }
        fn should_start(&mut self) -> bool {
            true
        }
        fn is_interruptible(&self) -> bool {
            self.interruptible
        }
        fn on_start(&mut self) {
            self.starts += 1;
        }
        fn on_end(&mut self) {
            self.ends += 1;
        }
        fn on_tick(&mut self) {
            self.ticks += 1;
        }
    }

    #[test]
    fn disjoint_tasks_coexist() {
        let mut scheduler = AiScheduler::new();
        scheduler.add_task(1, Box::new(AlwaysWants::new(MUTEX_MOVE, true)));
        scheduler.add_task(2, Box::new(AlwaysWants::new(MUTEX_LOOK, true)));
        for _ in 0..3 {
            scheduler.tick();
        }
        assert!(scheduler.is_running(0));
        assert!(scheduler.is_running(1));
    }

    #[test]
    fn higher_priority_preempts_interruptible_lower_priority() {
        let mut scheduler = AiScheduler::new();
        scheduler.add_task(5, Box::new(AlwaysWants::new(MUTEX_MOVE, true)));
        for _ in 0..3 {
            scheduler.tick();
        }
        assert!(scheduler.is_running(0));

        scheduler.add_task(1, Box::new(AlwaysWants::new(MUTEX_MOVE, true)));
        for _ in 0..3 {
            scheduler.tick();
        }
        // index 0 is now the priority-1 task after re-sort.
        assert!(scheduler.is_running(0));
        assert!(!scheduler.is_running(1));
    }

    #[test]
    fn non_interruptible_task_blocks_preemption() {
        let mut scheduler = AiScheduler::new();
        scheduler.add_task(5, Box::new(AlwaysWants::new(MUTEX_MOVE, false)));
        for _ in 0..3 {
            scheduler.tick();
        }
        scheduler.add_task(1, Box::new(AlwaysWants::new(MUTEX_MOVE, true)));
        for _ in 0..3 {
            scheduler.tick();
        }
        // entries sorted by priority: index 0 = priority 1 (should NOT run,
        // blocked by the non-interruptible priority-5 task), index 1 =
        // priority 5 (keeps running).
        assert!(!scheduler.is_running(0));
        assert!(scheduler.is_running(1));
    }

    #[test]
    fn on_tick_only_fires_for_running_tasks() {
        let mut scheduler = AiScheduler::new();
        scheduler.add_task(1, Box::new(AlwaysWants::new(MUTEX_MOVE, true)));
        scheduler.tick();
        scheduler.tick();
        scheduler.tick(); // full evaluation starts it
        scheduler.tick(); // partial: stays running, ticks
        assert!(scheduler.is_running(0));
    }
}
