//! Subscription plans and their quota ceilings.
//!
//! Plan names are stored as uppercase text in the `users.plan` column and
//! compared exactly (case-sensitive). The per-plan quota ceiling is a
//! configuration value, not derived; see [`PlanQuotas`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Subscription plan of a user. Determines the quota ceiling and whether the
/// user may call the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    #[serde(rename = "FREE")]
    Free,
    #[serde(rename = "PREMIUM")]
    Premium,
    #[serde(rename = "ADMINISTRATOR")]
    Administrator,
}

impl Plan {
    /// Stored/wire representation of the plan.
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Premium => "PREMIUM",
            Plan::Administrator => "ADMINISTRATOR",
        }
    }

    /// Whether an admin may assign this plan to another user. Only the two
    /// paid-tier values are assignable; ADMINISTRATOR is never granted via
    /// the plan-change endpoint.
    pub fn is_assignable(self) -> bool {
        matches!(self, Plan::Free | Plan::Premium)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = CoreError;

    /// Exact, case-sensitive parse. Unrecognized values are a validation
    /// error; they never fall through to a default plan.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(Plan::Free),
            "PREMIUM" => Ok(Plan::Premium),
            "ADMINISTRATOR" => Ok(Plan::Administrator),
            other => Err(CoreError::Validation(format!(
                "Unknown plan '{other}'. Expected FREE, PREMIUM or ADMINISTRATOR"
            ))),
        }
    }
}

/// Configured quota ceilings per plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanQuotas {
    pub free: i32,
    pub premium: i32,
    pub administrator: i32,
}

impl PlanQuotas {
    /// The quota ceiling for a plan.
    pub fn ceiling(&self, plan: Plan) -> i32 {
        match plan {
            Plan::Free => self.free,
            Plan::Premium => self.premium,
            Plan::Administrator => self.administrator,
        }
    }
}

impl Default for PlanQuotas {
    fn default() -> Self {
        Self {
            free: 20,
            premium: 40,
            // Effectively unlimited for administrators.
            administrator: 1_000_000,
        }
    }
}
