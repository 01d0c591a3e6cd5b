use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use talon_common::resource::Resources;
use talon_control::orchestrator::ScheduleOutcome;
use talon_control::robot::Robot;
use talon_control::task::{
    Deferred, InterruptPolicy, Parallel, Task, TaskExt, TaskStatus, run, run_end, run_once, wait,
};

use super::{robot, runner, zeroed_teleop};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn roller(speed: f64) -> impl FnMut(&mut Robot) + 'static {
    move |robot: &mut Robot| robot.subsystems.intake.set_roller_speed(speed)
}

#[test]
fn incoming_task_preempts_interruptible_holder() {
    let (rig, mut runner) = zeroed_teleop();
    let first = run_end(roller(0.5), roller(0.0))
        .requiring(Resources::INTAKE)
        .named("Spin")
        .boxed();
    runner.scheduler.schedule(first, &mut runner.robot);
    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.5);

    let second = run(roller(-0.3))
        .requiring(Resources::INTAKE | Resources::TRANSFER)
        .named("Reverse")
        .boxed();
    assert!(matches!(
        runner.scheduler.schedule(second, &mut runner.robot),
        ScheduleOutcome::Started(_)
    ));
    assert_eq!(rig.intake.model().roller_speed, 0.0);
    assert_eq!(runner.scheduler.running_names(), vec!["Reverse"]);

    runner.step();
    assert_eq!(rig.intake.model().roller_speed, -0.3);
    assert_eq!(runner.scheduler.stats().cancelled, 1);
}

#[test]
fn non_interruptible_holder_rejects_incoming() {
    let (_rig, mut runner) = zeroed_teleop();
    let holder = run(|_| {})
        .requiring(Resources::CLIMBER)
        .with_interrupt_policy(InterruptPolicy::CancelIncoming)
        .named("Climb")
        .boxed();
    let id = runner
        .scheduler
        .schedule(holder, &mut runner.robot)
        .task_id()
        .unwrap();

    let incoming = run(|_| {}).requiring(Resources::CLIMBER).named("Stow").boxed();
    assert_eq!(
        runner.scheduler.schedule(incoming, &mut runner.robot),
        ScheduleOutcome::Rejected {
            held_by: id,
            holder: "Climb".to_string()
        }
    );
    assert!(runner.scheduler.is_running(id));
}

#[test]
fn disjoint_tasks_run_side_by_side() {
    let (rig, mut runner) = zeroed_teleop();
    let spin = run(roller(0.2)).requiring(Resources::INTAKE).boxed();
    let climb = run(|robot: &mut Robot| robot.subsystems.climber.set_speed(0.4))
        .requiring(Resources::CLIMBER)
        .boxed();
    runner.scheduler.schedule(spin, &mut runner.robot);
    runner.scheduler.schedule(climb, &mut runner.robot);
    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.2);
    assert_eq!(
        runner.scheduler.held_resources(),
        Resources::INTAKE | Resources::CLIMBER
    );
}

#[test]
fn parallel_until_cancels_children_in_the_same_cycle() {
    let (rig, mut runner) = zeroed_teleop();
    let stop = Rc::new(Cell::new(false));
    let flag = Rc::clone(&stop);
    let task = Parallel::until(
        vec![run_end(roller(0.6), roller(0.0)).boxed(), run(|_| {}).boxed()],
        move |_| flag.get(),
    )
    .requiring(Resources::INTAKE)
    .boxed();
    runner.scheduler.schedule(task, &mut runner.robot);
    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.6);

    stop.set(true);
    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.0);
    assert!(runner.scheduler.is_idle());
}

#[test]
fn timeout_expires_on_the_exact_cycle() {
    let (_rig, mut runner) = zeroed_teleop();
    let task = run(|_| {}).with_timeout(Duration::from_millis(100)).boxed();
    runner.scheduler.schedule(task, &mut runner.robot);
    for _ in 0..4 {
        runner.step();
        assert!(!runner.scheduler.is_idle());
    }
    runner.step();
    assert!(runner.scheduler.is_idle());
    assert_eq!(runner.scheduler.stats().finished, 1);
}

#[test]
fn skipped_task_never_runs() {
    let (_rig, mut runner) = zeroed_teleop();
    let events = log();
    let sink = Rc::clone(&events);
    let task = run_once(move |_| sink.borrow_mut().push("ran"))
        .unless(|_| true)
        .boxed();
    runner.scheduler.schedule(task, &mut runner.robot);
    runner.step();
    assert!(events.borrow().is_empty());
    assert!(runner.scheduler.is_idle());
}

#[test]
fn sequence_advances_within_one_cycle() {
    let (_rig, mut runner) = zeroed_teleop();
    let events = log();
    let (a, b) = (Rc::clone(&events), Rc::clone(&events));
    let task = run_once(move |_| a.borrow_mut().push("a"))
        .and_then(run_once(move |_| b.borrow_mut().push("b")))
        .boxed();
    runner.scheduler.schedule(task, &mut runner.robot);
    runner.step();
    assert_eq!(*events.borrow(), vec!["a", "b"]);
    assert!(runner.scheduler.is_idle());
}

#[test]
fn child_cancel_predicate_aborts_the_rest_of_a_sequence() {
    let (rig, mut runner) = zeroed_teleop();
    let abort = Rc::new(Cell::new(false));
    let flag = Rc::clone(&abort);
    let events = log();
    let sink = Rc::clone(&events);
    let task = run_end(roller(0.4), roller(0.0))
        .cancel_when(move |_| flag.get())
        .and_then(run_once(move |_| sink.borrow_mut().push("later")))
        .requiring(Resources::INTAKE)
        .boxed();
    runner.scheduler.schedule(task, &mut runner.robot);
    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.4);

    abort.set(true);
    runner.step();
    assert!(runner.scheduler.is_idle());
    assert_eq!(runner.scheduler.stats().cancelled, 1);
    assert_eq!(rig.intake.model().roller_speed, 0.0);
    assert!(events.borrow().is_empty());
}

#[test]
fn disabled_robot_only_accepts_disable_safe_tasks() {
    let (_rig, mut runner) = runner();
    let plain = run_once(|_| {}).boxed();
    assert_eq!(
        runner.scheduler.schedule(plain, &mut runner.robot),
        ScheduleOutcome::Disabled
    );

    let safe = run_once(|_| {}).ignoring_disable().boxed();
    assert!(runner.scheduler.schedule(safe, &mut runner.robot).task_id().is_some());

    let pause = wait(Duration::from_millis(40)).boxed();
    assert!(runner.scheduler.schedule(pause, &mut runner.robot).task_id().is_some());
    runner.step();
    runner.step();
    assert!(runner.scheduler.is_idle());
}

#[test]
fn default_task_fills_idle_resource() {
    let (rig, mut runner) = zeroed_teleop();
    runner.scheduler.set_default_task(Resources::INTAKE, || {
        run(roller(0.1))
            .requiring(Resources::INTAKE)
            .named("IntakeIdle")
            .boxed()
    });
    runner.step();
    assert_eq!(runner.scheduler.running_names(), vec!["IntakeIdle"]);

    let burst = run_once(roller(0.9)).requiring(Resources::INTAKE).named("Burst").boxed();
    runner.scheduler.schedule(burst, &mut runner.robot);
    assert_eq!(runner.scheduler.running_names(), vec!["Burst"]);

    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.9);
    assert_eq!(runner.scheduler.running_names(), vec!["IntakeIdle"]);
    runner.step();
    assert_eq!(rig.intake.model().roller_speed, 0.1);
}

#[test]
fn deferred_task_reads_the_world_when_started() {
    let (rig, mut robot) = robot();
    let mut task = Deferred::new(|robot| {
        if robot.is_game_piece_stored() {
            run_once(roller(0.9)).named("WithPiece").boxed()
        } else {
            run_once(roller(0.1)).named("Empty").boxed()
        }
    });
    assert_eq!(task.name(), "Deferred");

    rig.transfer.model_mut().stored = true;
    task.start(&mut robot);
    assert_eq!(task.name(), "WithPiece");
    assert_eq!(task.tick(&mut robot), TaskStatus::Done);
    assert_eq!(rig.intake.model().roller_speed, 0.9);
}
