//! Fixed-rate control cycle.
//!
//! ## Cycle Body
//! 1. Clock advance and input sampling.
//! 2. Trigger evaluation.
//! 3. Orchestrator step.
//! 4. State-machine step.
//! 5. Actuation dispatch (`periodic` on every proxy).
//! 6. Indicator update (zero status while disabled).
//!
//! ## RT Setup
//! With the `rt` feature: `mlockall`, stack prefault, CPU pinning and
//! `SCHED_FIFO`, and absolute-time pacing with `clock_nanosleep`. Without
//! it the loop paces with `std::thread::sleep`.
//!
//! An overrun is logged and counted. The loop keeps running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use talon_common::state::RobotMode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bindings::configure_triggers;
use crate::config::RobotConfig;
use crate::maneuver::{AutoRegistry, zero_subsystems};
use crate::orchestrator::{ScheduleOutcome, Scheduler, TaskId};
use crate::robot::Robot;
use crate::subsystem::Subsystems;
use crate::task::BoxedTask;
use crate::telemetry::StatusSnapshot;
use crate::trigger::TriggerSet;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle body duration [ns].
    pub last_cycle_ns: i64,
    pub min_cycle_ns: i64,
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Cycles whose body exceeded the period.
    pub overruns: u64,
    /// Maximum wake-up latency [ns] (time between expected and actual wake).
    pub max_latency_ns: i64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += duration_ns;
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CycleError {
    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),
}

#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(())
}

/// Touch 256 KiB of stack so the loop does not fault pages in.
fn prefault_stack() {
    let mut buf = [0u8; 256 * 1024];
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid, aligned, exclusive reference.
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), CycleError> {
    Ok(())
}

#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` outlives the call; pid 0 is the calling thread.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), CycleError> {
    Ok(())
}

/// Full RT setup sequence. Call before [`CycleRunner::run`].
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    Ok(())
}

// ─── Pacing ─────────────────────────────────────────────────────────

/// Sleeps until the next cycle boundary.
struct Pacer {
    period: Duration,
    #[cfg(feature = "rt")]
    next_wake: nix::sys::time::TimeSpec,
    #[cfg(not(feature = "rt"))]
    next_wake: Instant,
}

impl Pacer {
    #[cfg(feature = "rt")]
    fn start(period: Duration) -> Result<Self, CycleError> {
        use nix::time::{ClockId, clock_gettime};
        let now = clock_gettime(ClockId::CLOCK_MONOTONIC)
            .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
        Ok(Self {
            period,
            next_wake: timespec_add_ns(now, period.as_nanos() as i64),
        })
    }

    /// Absolute-time sleep; returns the wake-up latency [ns].
    #[cfg(feature = "rt")]
    fn wait(&mut self) -> Result<i64, CycleError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};
        let clock = ClockId::CLOCK_MONOTONIC;
        let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &self.next_wake);
        let woke = clock_gettime(clock)
            .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
        let latency_ns = timespec_diff_ns(&woke, &self.next_wake).max(0);
        self.next_wake = timespec_add_ns(self.next_wake, self.period.as_nanos() as i64);
        Ok(latency_ns)
    }

    #[cfg(not(feature = "rt"))]
    fn start(period: Duration) -> Result<Self, CycleError> {
        Ok(Self {
            period,
            next_wake: Instant::now() + period,
        })
    }

    #[cfg(not(feature = "rt"))]
    fn wait(&mut self) -> Result<i64, CycleError> {
        let now = Instant::now();
        if let Some(remaining) = self.next_wake.checked_duration_since(now) {
            std::thread::sleep(remaining);
        }
        let woke = Instant::now();
        let latency = woke.saturating_duration_since(self.next_wake);
        // Far behind: resynchronise instead of bursting to catch up.
        self.next_wake = if latency > self.period {
            woke + self.period
        } else {
            self.next_wake + self.period
        };
        Ok(latency.as_nanos() as i64)
    }
}

#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Difference (a - b) in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

// ─── Match Timeline ─────────────────────────────────────────────────

/// Scripted mode sequence for unattended runs: disabled, autonomous, then
/// teleop. Measured in cycle-relative time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTimeline {
    pub disabled: Duration,
    pub autonomous: Duration,
    /// `None` runs teleop until stopped.
    pub teleop: Option<Duration>,
}

impl Default for MatchTimeline {
    fn default() -> Self {
        Self {
            disabled: Duration::from_secs(1),
            autonomous: Duration::from_secs(15),
            teleop: Some(Duration::from_secs(135)),
        }
    }
}

impl MatchTimeline {
    /// Mode at `elapsed`, or `None` once the match is over.
    pub fn mode_at(&self, elapsed: Duration) -> Option<RobotMode> {
        let auto_start = self.disabled;
        let teleop_start = auto_start + self.autonomous;
        if elapsed < auto_start {
            Some(RobotMode::Disabled)
        } else if elapsed < teleop_start {
            Some(RobotMode::Autonomous)
        } else {
            match self.teleop {
                Some(teleop) if elapsed >= teleop_start + teleop => None,
                _ => Some(RobotMode::Teleop),
            }
        }
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the robot context, the scheduler and the trigger set, and drives
/// them once per cycle.
pub struct CycleRunner {
    config: RobotConfig,
    pub robot: Robot,
    pub scheduler: Scheduler,
    pub triggers: TriggerSet,
    pub autos: AutoRegistry,
    pub stats: CycleStats,
    selected_auto: Option<String>,
    /// Routine built on an autonomous enable, held until zeroing ends.
    pending_auto: Option<BoxedTask>,
    auto_task: Option<TaskId>,
    zero_task: Option<TaskId>,
}

impl CycleRunner {
    pub fn new(config: RobotConfig, subsystems: Subsystems) -> Self {
        let robot = Robot::new(subsystems, &config);
        let mut triggers = TriggerSet::new();
        configure_triggers(&mut triggers, &config.feedback);
        let autos = AutoRegistry::standard(&config);
        let selected_auto = autos.default_name().map(str::to_owned);
        info!(
            period_ms = config.cycle.period_ms,
            triggers = triggers.len(),
            auto = ?selected_auto,
            "cycle runner ready"
        );

        Self {
            config,
            robot,
            scheduler: Scheduler::new(),
            triggers,
            autos,
            stats: CycleStats::new(),
            selected_auto,
            pending_auto: None,
            auto_task: None,
            zero_task: None,
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Choose the autonomous routine built on the next autonomous enable.
    pub fn select_auto(&mut self, name: &str) -> bool {
        if !self.autos.contains(name) {
            warn!(routine = name, "unknown autonomous routine");
            return false;
        }
        info!(routine = name, "autonomous routine selected");
        self.selected_auto = Some(name.to_owned());
        true
    }

    pub fn selected_auto(&self) -> Option<&str> {
        self.selected_auto.as_deref()
    }

    /// Switch robot mode. Disabling cancels tasks and neutralises outputs;
    /// enabling zeroes unzeroed mechanisms first and, in autonomous, then
    /// runs the selected routine. Leaving autonomous cancels only the
    /// routine; a zero in progress keeps running.
    pub fn set_mode(&mut self, mode: RobotMode) {
        let previous = self.robot.mode();
        if mode == previous {
            return;
        }
        info!(from = ?previous, to = ?mode, "robot mode changed");
        self.robot.set_mode(mode);

        self.pending_auto = None;
        if let Some(id) = self.auto_task.take() {
            self.scheduler.cancel(id, &mut self.robot);
        }

        if !mode.is_enabled() {
            self.scheduler.cancel_for_disable(&mut self.robot);
            self.zero_task = None;
            self.robot.subsystems.neutralize();
            let leds = &mut self.robot.subsystems.leds;
            for (slot, animation) in self.config.feedback.disabled_animations.iter().enumerate() {
                leds.set_animation(*animation, slot);
            }
            return;
        }

        self.robot.subsystems.leds.clear_animation();

        if !self.zeroing_in_progress() && !self.robot.zeroing.all_zeroed() {
            let zero = zero_subsystems(&self.config.zeroing);
            if let ScheduleOutcome::Started(id) = self.scheduler.schedule(zero, &mut self.robot) {
                self.zero_task = Some(id);
            }
        }

        if mode == RobotMode::Autonomous {
            self.pending_auto = self.build_selected_auto();
            self.start_pending_auto();
        }
    }

    fn zeroing_in_progress(&self) -> bool {
        self.zero_task.is_some_and(|id| self.scheduler.is_running(id))
    }

    /// Schedule the held autonomous routine once zeroing has released the
    /// mechanisms. A failed zero does not hold the routine back.
    fn start_pending_auto(&mut self) {
        if self.zeroing_in_progress() {
            return;
        }
        let Some(task) = self.pending_auto.take() else {
            return;
        };
        match self.scheduler.schedule(task, &mut self.robot) {
            ScheduleOutcome::Started(id) => self.auto_task = Some(id),
            outcome => warn!(?outcome, "autonomous routine not started"),
        }
    }

    fn build_selected_auto(&self) -> Option<BoxedTask> {
        let name = self.selected_auto.as_deref()?;
        let task = self.autos.build(name);
        if task.is_none() {
            warn!(routine = name, "selected autonomous routine missing");
        }
        task
    }

    /// One control cycle.
    pub fn step(&mut self) {
        self.robot.clock.advance();
        self.triggers.poll_all(&mut self.robot, &mut self.scheduler);

        self.start_pending_auto();
        let robot = &mut self.robot;
        self.scheduler.run(robot);
        robot.modes.periodic(&mut robot.subsystems);
        robot.subsystems.periodic(robot.clock.period());

        if !robot.is_enabled() {
            robot.show_zero_status(&self.config.feedback);
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::capture(
            &self.robot,
            &self.scheduler,
            self.stats.overruns,
            self.stats.avg_cycle_ns(),
        )
    }

    /// Paced loop. Follows `timeline` until it ends, `running` clears, or
    /// `max_cycles` cycles have run; the robot is disabled on exit.
    pub fn run(
        &mut self,
        running: &AtomicBool,
        timeline: &MatchTimeline,
        max_cycles: Option<u64>,
    ) -> Result<(), CycleError> {
        let period = self.robot.clock.period();
        let budget_ns = period.as_nanos() as i64;
        let snapshot_interval = self.config.cycle.snapshot_interval.max(1);
        let mut pacer = Pacer::start(period)?;
        let mut latency_ns = 0;

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("stop requested");
                break;
            }
            if max_cycles.is_some_and(|max| self.stats.cycle_count >= max) {
                info!(cycles = self.stats.cycle_count, "cycle limit reached");
                break;
            }
            match timeline.mode_at(self.robot.now()) {
                Some(mode) => self.set_mode(mode),
                None => {
                    info!("match complete");
                    break;
                }
            }

            let cycle_start = Instant::now();
            self.step();
            let duration_ns = cycle_start.elapsed().as_nanos() as i64;
            self.stats.record(duration_ns, latency_ns);

            if duration_ns > budget_ns {
                self.stats.overruns += 1;
                warn!(actual_ns = duration_ns, budget_ns, "cycle overrun");
            }
            if self.stats.cycle_count % snapshot_interval == 0 {
                debug!(snapshot = %self.snapshot().to_json(), "status");
            }

            latency_ns = pacer.wait()?;
        }

        self.set_mode(RobotMode::Disabled);
        info!(
            cycles = self.stats.cycle_count,
            overruns = self.stats.overruns,
            avg_us = self.stats.avg_cycle_ns() / 1_000,
            max_us = self.stats.max_cycle_ns / 1_000,
            "control loop stopped"
        );
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
