//! TOML configuration for the control core, with validation.
//!
//! Every section carries serde defaults so an empty file yields a runnable
//! configuration. Durations are stored as seconds (`*_s`) in TOML and exposed
//! as `Duration` through accessor methods.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use talon_common::config::{ConfigError, ConfigLoader, SharedConfig};
use talon_common::consts::{CYCLE_PERIOD_MS, CYCLE_PERIOD_MS_MAX, CYCLE_PERIOD_MS_MIN};
use talon_common::feedback::{LedAnimation, Rgb};

use crate::subsystem::drivetrain::Pose;
use crate::subsystem::shooter::ShooterSetpoint;

/// Convert seconds to a `Duration`, mapping negative/NaN input to zero.
#[inline]
pub fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete robot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub shared: SharedConfig,
    pub cycle: CycleConfig,
    pub setpoints: StateSetpoints,
    pub shooter: ShooterConfig,
    pub drivetrain: DrivetrainConfig,
    pub zeroing: ZeroingSettings,
    pub maneuvers: ManeuverConfig,
    pub feedback: FeedbackConfig,
}

impl RobotConfig {
    /// Load and validate a configuration file.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        Self::load_checked(path, Self::validate)
    }

    /// Parse and validate configuration text (used by tests and tooling).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Run every section's validation rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.cycle.validate().map_err(ConfigError::ValidationError)?;
        self.shooter.validate().map_err(ConfigError::ValidationError)?;
        self.drivetrain.validate().map_err(ConfigError::ValidationError)?;
        self.zeroing
            .elevator
            .validate("zeroing.elevator")
            .map_err(ConfigError::ValidationError)?;
        self.zeroing
            .shooter_pivot
            .validate("zeroing.shooter_pivot")
            .map_err(ConfigError::ValidationError)?;
        self.maneuvers.validate().map_err(ConfigError::ValidationError)?;
        self.feedback.validate().map_err(ConfigError::ValidationError)?;
        Ok(())
    }
}

// ─── Cycle ──────────────────────────────────────────────────────────

/// Control loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Control cycle period [ms] (default: 20).
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    /// Status snapshot log interval [cycles] (default: 50 = 1 s).
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: u64,
}

fn default_period_ms() -> u64 {
    CYCLE_PERIOD_MS
}
fn default_snapshot_interval() -> u64 {
    50
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

impl CycleConfig {
    #[inline]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    fn validate(&self) -> Result<(), String> {
        if !(CYCLE_PERIOD_MS_MIN..=CYCLE_PERIOD_MS_MAX).contains(&self.period_ms) {
            return Err(format!(
                "cycle.period_ms {} out of range [{CYCLE_PERIOD_MS_MIN}, {CYCLE_PERIOD_MS_MAX}]",
                self.period_ms
            ));
        }
        if self.snapshot_interval == 0 {
            return Err("cycle.snapshot_interval must be > 0".to_string());
        }
        Ok(())
    }
}

// ─── State Setpoints ────────────────────────────────────────────────

/// Actuator setpoints issued when a robot state is entered.
///
/// Roller and feeder speeds are duty cycles in [-1, 1]; elevator positions
/// are metres above the zeroed hard stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSetpoints {
    pub intake_roller_speed: f64,
    pub transfer_intake_speed: f64,
    pub transfer_feed_speed: f64,
    pub transfer_source_speed: f64,
    pub eject_speed: f64,
    pub elevator_stow: f64,
    pub idle_shooter: ShooterSetpoint,
    pub source_shooter: ShooterSetpoint,
    pub shuffle_shooter: ShooterSetpoint,
    pub speaker_shooter: ShooterSetpoint,
    /// Flywheel speeds for vision shots; the pivot angle comes from the
    /// shooter vision table.
    pub vision_left_rps: f64,
    pub vision_right_rps: f64,
}

impl Default for StateSetpoints {
    fn default() -> Self {
        Self {
            intake_roller_speed: 0.8,
            transfer_intake_speed: 0.5,
            transfer_feed_speed: 1.0,
            transfer_source_speed: -0.4,
            eject_speed: 0.6,
            elevator_stow: 0.0,
            idle_shooter: ShooterSetpoint::new(10.0, 10.0, 20.0),
            source_shooter: ShooterSetpoint::new(-20.0, -20.0, 50.0),
            shuffle_shooter: ShooterSetpoint::new(45.0, 40.0, 35.0),
            speaker_shooter: ShooterSetpoint::new(60.0, 50.0, 55.0),
            vision_left_rps: 70.0,
            vision_right_rps: 55.0,
        }
    }
}

// ─── Shooter ────────────────────────────────────────────────────────

/// Shooter readiness tolerances and the vision aiming table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    /// Flywheel speed tolerance for "ready to shoot" [rot/s].
    pub rps_tolerance: f64,
    /// Pivot angle tolerance [deg].
    pub pivot_tolerance_deg: f64,
    /// `[distance_m, pivot_deg]` pairs, ascending by distance.
    pub vision_table: Vec<[f64; 2]>,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            rps_tolerance: 2.0,
            pivot_tolerance_deg: 1.0,
            vision_table: vec![
                [1.0, 55.0],
                [2.0, 45.0],
                [3.0, 38.0],
                [4.0, 33.0],
                [5.0, 30.0],
            ],
        }
    }
}

impl ShooterConfig {
    /// Pivot angle for a speaker distance, linearly interpolated and clamped
    /// to the table ends.
    pub fn pivot_for_distance(&self, distance: f64) -> f64 {
        let table = &self.vision_table;
        let Some(first) = table.first() else {
            return 0.0;
        };
        if distance <= first[0] {
            return first[1];
        }
        for pair in table.windows(2) {
            let [d0, a0] = pair[0];
            let [d1, a1] = pair[1];
            if distance <= d1 {
                let t = (distance - d0) / (d1 - d0);
                return a0 + t * (a1 - a0);
            }
        }
        table[table.len() - 1][1]
    }

    fn validate(&self) -> Result<(), String> {
        if self.rps_tolerance <= 0.0 || self.pivot_tolerance_deg <= 0.0 {
            return Err("shooter tolerances must be > 0".to_string());
        }
        if self.vision_table.is_empty() {
            return Err("shooter.vision_table cannot be empty".to_string());
        }
        if self.vision_table.windows(2).any(|w| w[1][0] <= w[0][0]) {
            return Err("shooter.vision_table distances must be strictly ascending".to_string());
        }
        Ok(())
    }
}

// ─── Drivetrain ─────────────────────────────────────────────────────

/// Aiming parameters and field geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainConfig {
    /// Heading tolerance for "facing target" [deg].
    pub facing_tolerance_deg: f64,
    /// Proportional gain of the heading snap controller [1/s].
    pub snap_kp: f64,
    /// Snap rate limit [rad/s].
    pub max_snap_rate: f64,
    /// Speaker opening, field coordinates [m].
    pub speaker: [f64; 2],
    /// Shuffle landing zone, field coordinates [m].
    pub shuffle: [f64; 2],
    /// Autonomous start poses `[x_m, y_m, heading_deg]`, indexed amp-side,
    /// center, source-side.
    pub start_poses: Vec<[f64; 3]>,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            facing_tolerance_deg: 3.0,
            snap_kp: 5.0,
            max_snap_rate: 6.0,
            speaker: [0.0, 5.55],
            shuffle: [1.5, 7.0],
            start_poses: vec![[0.75, 6.7, 60.0], [1.35, 5.55, 0.0], [0.75, 4.4, -60.0]],
        }
    }
}

impl DrivetrainConfig {
    #[inline]
    pub fn facing_tolerance(&self) -> f64 {
        self.facing_tolerance_deg.to_radians()
    }

    /// Start pose by index, if configured.
    pub fn start_pose(&self, index: usize) -> Option<Pose> {
        self.start_poses
            .get(index)
            .map(|[x, y, heading_deg]| Pose::new(*x, *y, heading_deg.to_radians()))
    }

    fn validate(&self) -> Result<(), String> {
        if self.facing_tolerance_deg <= 0.0 {
            return Err("drivetrain.facing_tolerance_deg must be > 0".to_string());
        }
        if self.snap_kp <= 0.0 || self.max_snap_rate <= 0.0 {
            return Err("drivetrain snap gain and rate must be > 0".to_string());
        }
        if self.start_poses.len() < 3 {
            return Err(format!(
                "drivetrain.start_poses needs 3 entries, got {}",
                self.start_poses.len()
            ));
        }
        Ok(())
    }
}

// ─── Zeroing ────────────────────────────────────────────────────────

/// Zeroing parameters for both zeroable mechanisms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroingSettings {
    pub elevator: ZeroingConfig,
    pub shooter_pivot: ZeroingConfig,
}

impl Default for ZeroingSettings {
    fn default() -> Self {
        Self {
            elevator: ZeroingConfig::default(),
            shooter_pivot: ZeroingConfig {
                voltage: -1.0,
                current_threshold: 15.0,
                ..ZeroingConfig::default()
            },
        }
    }
}

/// Hard-stop zeroing of a single mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroingConfig {
    /// Open-loop voltage driving the mechanism into its hard stop [V].
    pub voltage: f64,
    /// Stator current indicating the hard stop was reached [A].
    pub current_threshold: f64,
    /// Consecutive cycles above threshold before the stop is accepted.
    pub confirm_cycles: u32,
    /// Velocity away from the stop that aborts zeroing [units/s].
    pub reverse_velocity_limit: f64,
    /// Whole-attempt timeout [s].
    pub timeout_s: f64,
}

impl Default for ZeroingConfig {
    fn default() -> Self {
        Self {
            voltage: -1.5,
            current_threshold: 20.0,
            confirm_cycles: 3,
            reverse_velocity_limit: 0.5,
            timeout_s: 3.0,
        }
    }
}

impl ZeroingConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        secs(self.timeout_s)
    }

    fn validate(&self, section: &str) -> Result<(), String> {
        if self.voltage == 0.0 || !self.voltage.is_finite() {
            return Err(format!("{section}.voltage must be non-zero"));
        }
        if self.current_threshold <= 0.0 {
            return Err(format!("{section}.current_threshold must be > 0"));
        }
        if self.confirm_cycles == 0 {
            return Err(format!("{section}.confirm_cycles must be > 0"));
        }
        if !(self.timeout_s > 0.0) {
            return Err(format!("{section}.timeout_s must be > 0"));
        }
        Ok(())
    }
}

// ─── Maneuvers ──────────────────────────────────────────────────────

/// Timing of maneuver compositions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverConfig {
    /// Delay between the piece leaving and returning to NONE [s].
    pub settle_delay_s: f64,
    /// Autonomous shots give up preparing after this long [s].
    pub auto_prep_timeout_s: f64,
    /// Autonomous shots give up feeding after this long [s].
    pub auto_shot_timeout_s: f64,
    /// Wait before the preload shot [s].
    pub preload_delay_s: f64,
    /// Open-loop taxi drive duration [s].
    pub taxi_duration_s: f64,
    /// Open-loop taxi drive speed [m/s].
    pub taxi_speed: f64,
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            settle_delay_s: 0.1,
            auto_prep_timeout_s: 2.0,
            auto_shot_timeout_s: 1.0,
            preload_delay_s: 0.0,
            taxi_duration_s: 1.5,
            taxi_speed: 1.0,
        }
    }
}

impl ManeuverConfig {
    #[inline]
    pub fn settle_delay(&self) -> Duration {
        secs(self.settle_delay_s)
    }
    #[inline]
    pub fn auto_prep_timeout(&self) -> Duration {
        secs(self.auto_prep_timeout_s)
    }
    #[inline]
    pub fn auto_shot_timeout(&self) -> Duration {
        secs(self.auto_shot_timeout_s)
    }
    #[inline]
    pub fn preload_delay(&self) -> Duration {
        secs(self.preload_delay_s)
    }
    #[inline]
    pub fn taxi_duration(&self) -> Duration {
        secs(self.taxi_duration_s)
    }

    fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("settle_delay_s", self.settle_delay_s),
            ("preload_delay_s", self.preload_delay_s),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(format!("maneuvers.{name} must be >= 0"));
            }
        }
        let positive = [
            ("auto_prep_timeout_s", self.auto_prep_timeout_s),
            ("auto_shot_timeout_s", self.auto_shot_timeout_s),
            ("taxi_duration_s", self.taxi_duration_s),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(format!("maneuvers.{name} must be > 0"));
            }
        }
        Ok(())
    }
}

// ─── Feedback ───────────────────────────────────────────────────────

/// Rumble strengths, indicator colours and the LED strip layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub driver_rumble: f64,
    pub operator_rumble: f64,
    pub collected_rumble: f64,
    pub collected_color: Rgb,
    pub ready_to_shoot_animation: LedAnimation,
    pub disabled_animations: [LedAnimation; 2],
    pub elevator_zeroed: Rgb,
    pub elevator_attempting_zero: Rgb,
    pub elevator_not_zeroed: Rgb,
    pub shooter_zeroed: Rgb,
    pub shooter_attempting_zero: Rgb,
    pub shooter_not_zeroed: Rgb,
    /// `[start, length]` strip segments showing elevator zero status.
    pub elevator_segments: Vec<[u16; 2]>,
    /// `[start, length]` strip segments showing shooter zero status.
    pub shooter_segments: Vec<[u16; 2]>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            driver_rumble: 0.5,
            operator_rumble: 0.8,
            collected_rumble: 0.6,
            collected_color: Rgb::ORANGE,
            ready_to_shoot_animation: LedAnimation::Strobe {
                color: Rgb::GREEN,
                speed: 0.5,
            },
            disabled_animations: [
                LedAnimation::Larson {
                    color: Rgb::BLUE,
                    speed: 0.3,
                },
                LedAnimation::SingleFade {
                    color: Rgb::PURPLE,
                    speed: 0.2,
                },
            ],
            elevator_zeroed: Rgb::GREEN,
            elevator_attempting_zero: Rgb::YELLOW,
            elevator_not_zeroed: Rgb::RED,
            shooter_zeroed: Rgb::BLUE,
            shooter_attempting_zero: Rgb::YELLOW,
            shooter_not_zeroed: Rgb::RED,
            elevator_segments: vec![[0, 2], [6, 2]],
            shooter_segments: vec![[2, 4]],
        }
    }
}

impl FeedbackConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("driver_rumble", self.driver_rumble),
            ("operator_rumble", self.operator_rumble),
            ("collected_rumble", self.collected_rumble),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("feedback.{name} {value} out of range [0, 1]"));
            }
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
