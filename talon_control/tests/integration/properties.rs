//! Random request sequences against an independent model of the
//! transition rules.

use proptest::prelude::*;
use talon_common::state::RobotState;
use talon_control::state::TransitionResult;

use super::robot;

fn legal(current: RobotState, requested: RobotState, stored: bool, ready: bool) -> bool {
    use RobotState::*;
    match requested {
        None | Ejecting => true,
        Intaking | IntakeSource => !stored,
        StoreFeeder | PrepVision | PrepShuffle | PrepSpeaker => stored,
        Shooting => current.is_prep() && stored && ready,
    }
}

fn request() -> impl Strategy<Value = (usize, bool, bool)> {
    (0..RobotState::ALL.len(), any::<bool>(), any::<bool>())
}

proptest! {
    #[test]
    fn transitions_follow_preconditions(requests in prop::collection::vec(request(), 1..64)) {
        let (rig, mut robot) = robot();
        let mut applied = 0;

        for (index, stored, ready) in requests {
            rig.transfer.model_mut().stored = stored;
            rig.shooter.model_mut().ready_override = Some(ready);
            let current = robot.robot_state();
            let requested = RobotState::ALL[index];

            let result = robot.try_state(requested);
            if requested == current {
                prop_assert_eq!(result, TransitionResult::AlreadyActive);
                prop_assert_eq!(robot.robot_state(), current);
            } else if legal(current, requested, stored, ready) {
                prop_assert_eq!(result, TransitionResult::Applied(requested));
                prop_assert_eq!(robot.robot_state(), requested);
                applied += 1;
            } else {
                prop_assert!(matches!(result, TransitionResult::Rejected(_)));
                prop_assert_eq!(robot.robot_state(), current);
            }
        }

        prop_assert_eq!(robot.modes.transition_count(), applied);
    }

    #[test]
    fn target_never_moves_current(requests in prop::collection::vec(0..4usize, 1..32)) {
        let (rig, mut robot) = robot();
        rig.transfer.model_mut().stored = true;
        for index in requests {
            let before = robot.robot_state();
            robot.set_target_state(talon_common::state::TargetState::ALL[index]);
            prop_assert_eq!(robot.robot_state(), before);
        }
    }
}
