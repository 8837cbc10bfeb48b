use orbis_core::{Action, State};

use super::Task;
use crate::job::Job;

/// Doing nothing. Every entity starts out idle.
#[derive(Debug, Default)]
pub struct IdleTask;

impl Task for IdleTask {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn start(&mut self, _state: &mut State) -> Vec<Action> {
        Vec::new()
    }

    fn take_job(&mut self) -> Option<Job> {
        None
    }

    fn finish(&mut self, _state: &mut State) -> Vec<Action> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::testing::world;

    #[test]
    fn idle_has_no_effect() {
        let mut state = world(Vec::new());
        let mut task = IdleTask;
        assert!(task.start(&mut state).is_empty());
        assert!(task.take_job().is_none());
        assert!(task.finish(&mut state).is_empty());
    }
}
