//! Role vocabulary: capability profiles a user can hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability profile variants. A user holds at most one profile per
/// variant; different variants may coexist on the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Waiter,
    Cook,
    Cashier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Waiter => "waiter",
            Role::Cook => "cook",
            Role::Cashier => "cashier",
            Role::Admin => "admin",
        }
    }

    /// Profile table backing this variant.
    pub fn profile_table(&self) -> &'static str {
        match self {
            Role::Waiter => "waiter_profiles",
            Role::Cook => "cook_profiles",
            Role::Cashier => "cashier_profiles",
            Role::Admin => "admin_profiles",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiter" => Ok(Role::Waiter),
            "cook" => Ok(Role::Cook),
            "cashier" => Ok(Role::Cashier),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
