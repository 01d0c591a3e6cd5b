//! Cooperative tasks and their compositions.
//!
//! A task is started once, ticked once per cycle until it reports `Done` or
//! `Cancelled`, then ended exactly once. Whoever ticks a task (the scheduler
//! or a parent composite) owns that lifecycle. Nothing here blocks: waiting
//! is a task that keeps returning `Running`.

pub mod base;
pub mod basic;
pub mod composite;
pub mod decorator;
pub mod deferred;
pub mod mode;

pub use base::{
    BoxedTask, Condition, EndReason, InterruptPolicy, Task, TaskExt, TaskStatus,
};
pub use basic::{RunOnce, Run, Wait, WaitUntil, run, run_end, run_once, wait, wait_seconds, wait_until};
pub use composite::{Join, Parallel, Sequence};
pub use decorator::{CancelWhen, Configured, Repeatedly, Unless, WithTimeout};
pub use deferred::Deferred;
pub use mode::{SetTarget, TryState, TryTargetState, set_target_state, try_state, try_target_state};
