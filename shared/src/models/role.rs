//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Waiter,
    Kitchen,
}

/// Screen a role lands on after login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingView {
    Billing,
    Waiter,
    Kitchen,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Owner, Role::Waiter, Role::Kitchen];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Waiter => "waiter",
            Role::Kitchen => "kitchen",
        }
    }

    /// 登录后跳转页面
    pub fn landing_view(&self) -> LandingView {
        match self {
            Role::Owner => LandingView::Billing,
            Role::Waiter => LandingView::Waiter,
            Role::Kitchen => LandingView::Kitchen,
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
            "owner" => Ok(Role::Owner),
            "waiter" => Ok(Role::Waiter),
            "kitchen" => Ok(Role::Kitchen),
            other => Err(format!("Role not recognized: {}", other)),
        }
    }
}
