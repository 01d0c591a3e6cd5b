//! Swerve drivetrain proxy and field geometry.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use serde::Serialize;

use crate::config::DrivetrainConfig;
use crate::subsystem::sim::SimHandle;

/// Field pose: position [m] and heading [rad].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }
}

/// Scoring locations the drivetrain can aim at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    Speaker,
    Shuffle,
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// Drivetrain proxy.
pub trait Drivetrain {
    /// Command chassis velocity [m/s, m/s, rad/s].
    fn drive(&mut self, vx: f64, vy: f64, omega: f64, field_relative: bool);
    fn pose(&self) -> Pose;
    fn heading(&self) -> f64 {
        self.pose().heading
    }
    fn reset_pose(&mut self, pose: Pose);
    fn add_vision_measurement(&mut self, pose: Pose);
    /// Field angle from the robot to `target` [rad].
    fn angle_to(&self, target: FieldTarget) -> f64;
    fn distance_to(&self, target: FieldTarget) -> f64;
    /// Heading within tolerance of `angle_to(target)`.
    fn is_facing(&self, target: FieldTarget) -> bool;
    /// Rotation rate that snaps the heading toward `angle` [rad/s].
    fn velocity_to_snap(&self, angle: f64) -> f64;
    fn periodic(&mut self, dt: Duration);
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Kinematic drivetrain model: commanded velocities integrate directly.
#[derive(Debug, Clone, Default)]
pub struct DrivetrainModel {
    pub pose: Pose,
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
    pub field_relative: bool,
    pub facing_tolerance: f64,
    pub snap_kp: f64,
    pub max_snap_rate: f64,
    pub speaker: [f64; 2],
    pub shuffle: [f64; 2],
    pub vision_measurements: u32,
}

impl DrivetrainModel {
    pub fn new(config: &DrivetrainConfig) -> Self {
        Self {
            pose: Pose::default(),
            facing_tolerance: config.facing_tolerance(),
            snap_kp: config.snap_kp,
            max_snap_rate: config.max_snap_rate,
            speaker: config.speaker,
            shuffle: config.shuffle,
            ..Self::default()
        }
    }

    fn target_position(&self, target: FieldTarget) -> [f64; 2] {
        match target {
            FieldTarget::Speaker => self.speaker,
            FieldTarget::Shuffle => self.shuffle,
        }
    }

    /// Place the robot so that it faces `target` exactly.
    pub fn face(&mut self, target: FieldTarget) {
        let [tx, ty] = self.target_position(target);
        self.pose.heading = (ty - self.pose.y).atan2(tx - self.pose.x);
    }
}

pub type SimDrivetrain = SimHandle<DrivetrainModel>;

impl Drivetrain for SimHandle<DrivetrainModel> {
    fn drive(&mut self, vx: f64, vy: f64, omega: f64, field_relative: bool) {
        let mut m = self.model_mut();
        m.vx = vx;
        m.vy = vy;
        m.omega = omega;
        m.field_relative = field_relative;
    }

    fn pose(&self) -> Pose {
        self.model().pose
    }

    fn reset_pose(&mut self, pose: Pose) {
        self.model_mut().pose = pose;
    }

    fn add_vision_measurement(&mut self, pose: Pose) {
        let mut m = self.model_mut();
        m.pose = pose;
        m.vision_measurements += 1;
    }

    fn angle_to(&self, target: FieldTarget) -> f64 {
        let m = self.model();
        let [tx, ty] = m.target_position(target);
        (ty - m.pose.y).atan2(tx - m.pose.x)
    }

    fn distance_to(&self, target: FieldTarget) -> f64 {
        let m = self.model();
        let [tx, ty] = m.target_position(target);
        (tx - m.pose.x).hypot(ty - m.pose.y)
    }

    fn is_facing(&self, target: FieldTarget) -> bool {
        let error = wrap_angle(self.angle_to(target) - self.model().pose.heading);
        error.abs() <= self.model().facing_tolerance
    }

    fn velocity_to_snap(&self, angle: f64) -> f64 {
        let m = self.model();
        let error = wrap_angle(angle - m.pose.heading);
        (m.snap_kp * error).clamp(-m.max_snap_rate, m.max_snap_rate)
    }

    fn periodic(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        let mut m = self.model_mut();
        let (vx, vy) = if m.field_relative {
            (m.vx, m.vy)
        } else {
            let (sin, cos) = m.pose.heading.sin_cos();
            (m.vx * cos - m.vy * sin, m.vx * sin + m.vy * cos)
        };
        m.pose.x += vx * dt;
        m.pose.y += vy * dt;
        m.pose.heading = wrap_angle(m.pose.heading + m.omega * dt);
    }
}
