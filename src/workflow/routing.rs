use std::fmt;

use crate::core::models::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    Dispatcher,
    Downloader,
    Commander,
    Podcaster,
}

impl StepName {
    pub const ALL: [StepName; 4] = [
        StepName::Dispatcher,
        StepName::Downloader,
        StepName::Commander,
        StepName::Podcaster,
    ];

    /// Name of the task state invoking this step's function.
    #[must_use]
    pub fn task_state(self) -> &'static str {
        match self {
            StepName::Dispatcher => "DispatcherTask",
            StepName::Downloader => "DownloaderTask",
            StepName::Commander => "CommanderTask",
            StepName::Podcaster => "PodcasterTask",
        }
    }

    /// Name of the choice state inspecting this step's result.
    #[must_use]
    pub fn choice_state(self) -> &'static str {
        match self {
            StepName::Dispatcher => "Dispatching Result?",
            StepName::Downloader => "Downloading Result?",
            StepName::Commander => "Commander?",
            StepName::Podcaster => "Podcaster?",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepName::Dispatcher => "Dispatcher",
            StepName::Downloader => "Downloader",
            StepName::Commander => "Commander",
            StepName::Podcaster => "Podcaster",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(StepName),
    Succeed,
    Fail,
}

/// Statuses each step may answer with and where they lead. Any other status,
/// `FAILURE` included, ends the execution as failed.
#[must_use]
pub fn choices(step: StepName) -> &'static [(Status, Transition)] {
    match step {
        StepName::Dispatcher => &[
            (Status::Downloader, Transition::Next(StepName::Downloader)),
            (Status::Commander, Transition::Next(StepName::Commander)),
            (Status::Finish, Transition::Succeed),
        ],
        StepName::Downloader | StepName::Commander => &[
            (Status::Podcaster, Transition::Next(StepName::Podcaster)),
            (Status::Finish, Transition::Succeed),
        ],
        StepName::Podcaster => &[(Status::Finish, Transition::Succeed)],
    }
}

#[must_use]
pub fn route(step: StepName, status: Status) -> Transition {
    choices(step)
        .iter()
        .find(|(s, _)| *s == status)
        .map_or(Transition::Fail, |(_, t)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_always_fails() {
        for step in StepName::ALL {
            assert_eq!(route(step, Status::Failure), Transition::Fail);
        }
    }

    #[test]
    fn finish_always_succeeds() {
        for step in StepName::ALL {
            assert_eq!(route(step, Status::Finish), Transition::Succeed);
        }
    }
}
