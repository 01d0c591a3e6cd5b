//! Driver and operator controller feedback.

use talon_common::feedback::RumbleSide;

use crate::subsystem::sim::SimHandle;

/// Which controller a rumble request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Controller {
    Driver,
    Operator,
}

/// Rumble motors of both controllers.
pub trait OperatorFeedback {
    fn rumble(&mut self, controller: Controller, side: RumbleSide, strength: f64);

    /// Both controllers at once.
    fn set_rumble(&mut self, side: RumbleSide, strength: f64) {
        self.rumble(Controller::Driver, side, strength);
        self.rumble(Controller::Operator, side, strength);
    }
}

/// `[left, right]` rumble strength per controller.
#[derive(Debug, Clone, Default)]
pub struct OperatorModel {
    pub driver: [f64; 2],
    pub operator: [f64; 2],
}

impl OperatorModel {
    pub fn strength(&self, controller: Controller) -> f64 {
        let [left, right] = match controller {
            Controller::Driver => self.driver,
            Controller::Operator => self.operator,
        };
        left.max(right)
    }
}

pub type SimOperator = SimHandle<OperatorModel>;

impl OperatorFeedback for SimHandle<OperatorModel> {
    fn rumble(&mut self, controller: Controller, side: RumbleSide, strength: f64) {
        let strength = strength.clamp(0.0, 1.0);
        let mut m = self.model_mut();
        let motors = match controller {
            Controller::Driver => &mut m.driver,
            Controller::Operator => &mut m.operator,
        };
        match side {
            RumbleSide::Left => motors[0] = strength,
            RumbleSide::Right => motors[1] = strength,
            RumbleSide::Both => *motors = [strength; 2],
        }
    }
}
