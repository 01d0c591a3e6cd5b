//! Late-bound tasks.

use talon_common::resource::Resources;

use crate::robot::Robot;
use crate::task::base::{BoxedTask, Child, EndReason, Task, TaskStatus};

type Factory = Box<dyn FnMut(&Robot) -> BoxedTask>;

/// Builds its inner task from the live robot context each time it starts,
/// so the inner task sees the world as it is when the step begins rather
/// than when the maneuver was composed.
///
/// The inner task is unknown until start, so requirements are declared
/// up front.
pub struct Deferred {
    factory: Factory,
    requirements: Resources,
    inner: Option<Child<BoxedTask>>,
}

impl Deferred {
    pub fn new(factory: impl FnMut(&Robot) -> BoxedTask + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            requirements: Resources::empty(),
            inner: None,
        }
    }

    pub fn with_requirements(mut self, requirements: Resources) -> Self {
        self.requirements = requirements;
        self
    }
}

impl Task for Deferred {
    fn name(&self) -> &str {
        self.inner
            .as_ref()
            .map_or("Deferred", |inner| inner.task.name())
    }

    fn requirements(&self) -> Resources {
        self.requirements
    }

    fn start(&mut self, robot: &mut Robot) {
        let mut inner = Child::new((self.factory)(robot));
        inner.start(robot);
        self.inner = Some(inner);
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        match self.inner.as_mut() {
            Some(inner) => inner.tick(robot),
            None => TaskStatus::Done,
        }
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        if let Some(mut inner) = self.inner.take() {
            inner.stop(robot, reason);
        }
    }
}
