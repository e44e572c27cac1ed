//! Staff role types.

use serde::{Deserialize, Serialize};

/// Staff permission level.
///
/// Wire format: string (`"sales"` / `"admin"`); stored as `i16`
/// (0 = Sales, 1 = Admin).
///
/// Admin supersedes Sales for user-management operations only; record
/// ownership (patients, prescriptions) is never role-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sales = 0,
    Admin = 1,
}

impl Role {
    /// Convert from `i16` storage value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Sales),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `i16` storage value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Parse from the wire string. Returns `None` for unknown values.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "sales" => Some(Self::Sales),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Sales
    }
}
