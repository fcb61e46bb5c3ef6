/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Action result status as reported by the build framework.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one scheduled action.
///
/// The numeric codes are the framework's; a failing status's code becomes the
/// process exit code of `anod build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Success,
    Failure,
    Missing,
    Skip,
    ForceSkip,
    ForceFail,
    Unchanged,
    NotReady,
    Unknown,
}

impl ActionStatus {
    pub fn code(self) -> i32 {
        match self {
            ActionStatus::Success => 0,
            ActionStatus::Failure => 1,
            ActionStatus::Missing => 2,
            ActionStatus::Skip => 3,
            ActionStatus::ForceSkip => 4,
            ActionStatus::ForceFail => 5,
            ActionStatus::Unchanged => 6,
            ActionStatus::NotReady => 75,
            ActionStatus::Unknown => 99,
        }
    }

    /// Success, skip, force-skip and unchanged all count as success.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            ActionStatus::Success
                | ActionStatus::Skip
                | ActionStatus::ForceSkip
                | ActionStatus::Unchanged
        )
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionStatus::Success => "success",
            ActionStatus::Failure => "failure",
            ActionStatus::Missing => "missing",
            ActionStatus::Skip => "skip",
            ActionStatus::ForceSkip => "force_skip",
            ActionStatus::ForceFail => "force_fail",
            ActionStatus::Unchanged => "unchanged",
            ActionStatus::NotReady => "not_ready",
            ActionStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Exit code for a sequence of statuses: the code of the first non-success
/// status, or `0`.
pub fn overall_exit_code<I>(statuses: I) -> i32
where
    I: IntoIterator<Item = ActionStatus>,
{
    statuses
        .into_iter()
        .find(|s| !s.is_success())
        .map(ActionStatus::code)
        .unwrap_or(0)
}
