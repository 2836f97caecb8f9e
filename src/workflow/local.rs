use tracing::{info, warn};

use super::routing::{StepName, Transition, route};
use crate::core::models::{Status, StepEvent};
use crate::steps::WorkflowStep;

/// Upper bound on the steps of one local execution. The routing table is
/// acyclic, so a well-formed run visits at most three.
pub const MAX_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Steps visited by one execution, each with the status it answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub visited: Vec<(StepName, Status)>,
    pub outcome: Outcome,
}

impl Execution {
    #[must_use]
    pub fn steps(&self) -> Vec<StepName> {
        self.visited.iter().map(|(step, _)| *step).collect()
    }
}

/// Runs the workflow in-process, following the same routing table as the
/// managed state machine.
pub struct LocalWorkflow<'a> {
    pub dispatcher: &'a dyn WorkflowStep,
    pub downloader: &'a dyn WorkflowStep,
    pub commander: &'a dyn WorkflowStep,
    pub podcaster: &'a dyn WorkflowStep,
}

impl LocalWorkflow<'_> {
    fn step(&self, name: StepName) -> &dyn WorkflowStep {
        match name {
            StepName::Dispatcher => self.dispatcher,
            StepName::Downloader => self.downloader,
            StepName::Commander => self.commander,
            StepName::Podcaster => self.podcaster,
        }
    }

    pub async fn run(&self, event: StepEvent) -> Execution {
        let mut visited = Vec::new();
        let mut current = StepName::Dispatcher;
        let mut event = event;

        while visited.len() < MAX_STEPS {
            let result = self.step(current).handle_event(event).await;
            info!(step = %current, status = %result.status, "Step finished");
            visited.push((current, result.status));

            match route(current, result.status) {
                Transition::Next(next) => {
                    current = next;
                    event = StepEvent {
                        message: result.message,
                    };
                }
                Transition::Succeed => {
                    return Execution {
                        visited,
                        outcome: Outcome::Succeeded,
                    };
                }
                Transition::Fail => {
                    return Execution {
                        visited,
                        outcome: Outcome::Failed,
                    };
                }
            }
        }

        warn!("Local workflow exceeded {} steps", MAX_STEPS);
        Execution {
            visited,
            outcome: Outcome::Failed,
        }
    }
}
