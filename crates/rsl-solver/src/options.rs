//! Solver configuration.
//!
//! Options are plain data, deserializable from the host's JSON settings:
//!
//! ```json
//! { "restrictionMemberConflicts": "report" }
//! ```
//!
//! Every field has a default, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};

/// How restricted types treat a member name declared by more than one restriction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberConflictPolicy {
    /// The restriction listed first provides the member.
    #[default]
    FirstWins,
    /// Differently typed declarations of the same name are an error.
    Report,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverOptions {
    pub restriction_member_conflicts: MemberConflictPolicy,
}

impl SolverOptions {
    #[must_use]
    pub const fn with_restriction_member_conflicts(mut self, policy: MemberConflictPolicy) -> Self {
        self.restriction_member_conflicts = policy;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
