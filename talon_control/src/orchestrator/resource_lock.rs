//! Per-resource ownership table.
//!
//! One slot per `Resources` flag. A task acquires its whole requirement set
//! atomically or not at all; the holder's interrupt policy is stored with
//! the lock so a newcomer can be judged without consulting the task.

use talon_common::resource::{RESOURCE_COUNT, Resources};

use crate::orchestrator::TaskId;
use crate::task::InterruptPolicy;

/// Result of an acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockResult {
    Acquired,
    /// A requested flag is held by another task.
    Rejected { held_by: TaskId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lock {
    holder: TaskId,
    policy: InterruptPolicy,
}

/// Lock table for every resource flag.
#[derive(Debug, Clone, Default)]
pub struct ResourceLocks {
    slots: [Option<Lock>; RESOURCE_COUNT],
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holder of a single resource flag.
    pub fn holder(&self, resource: Resources) -> Option<TaskId> {
        resource
            .slot()
            .and_then(|slot| self.slots[slot])
            .map(|lock| lock.holder)
    }

    /// Distinct tasks holding any flag of `resources`, with their policies,
    /// in flag order.
    pub fn conflicts(&self, resources: Resources) -> Vec<(TaskId, InterruptPolicy)> {
        let mut found: Vec<(TaskId, InterruptPolicy)> = Vec::new();
        for flag in resources.flags() {
            let Some(lock) = flag.slot().and_then(|slot| self.slots[slot]) else {
                continue;
            };
            if !found.iter().any(|(id, _)| *id == lock.holder) {
                found.push((lock.holder, lock.policy));
            }
        }
        found
    }

    /// Acquire every flag of `resources` for `task`, or none of them.
    ///
    /// Flags already held by `task` count as acquired.
    pub fn try_acquire(
        &mut self,
        resources: Resources,
        task: TaskId,
        policy: InterruptPolicy,
    ) -> LockResult {
        if let Some((held_by, _)) = self
            .conflicts(resources)
            .into_iter()
            .find(|(id, _)| *id != task)
        {
            return LockResult::Rejected { held_by };
        }
        self.assign(resources, task, policy);
        LockResult::Acquired
    }

    /// Give every flag of `resources` to `task`, displacing any holder.
    /// Callers resolve conflicts first.
    pub fn assign(&mut self, resources: Resources, task: TaskId, policy: InterruptPolicy) {
        for flag in resources.flags() {
            if let Some(slot) = flag.slot() {
                self.slots[slot] = Some(Lock {
                    holder: task,
                    policy,
                });
            }
        }
    }

    /// Release every flag `task` holds and return them.
    pub fn release_all(&mut self, task: TaskId) -> Resources {
        let mut released = Resources::empty();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_some_and(|lock| lock.holder == task) {
                *slot = None;
                released |= Resources::from_bits_truncate(1 << i);
            }
        }
        released
    }

    /// Flags currently held by anyone.
    pub fn held(&self) -> Resources {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .fold(Resources::empty(), |acc, (i, _)| {
                acc | Resources::from_bits_truncate(1 << i)
            })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
