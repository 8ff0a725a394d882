//! Role labels derived from the numeric `role_id` claim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of roles the console knows how to render.
///
/// Used only for client-side UI gating; the backend enforces authorization
/// on every request independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleLabel {
    /// Full administrator (`role_id` 1).
    #[serde(rename = "Admin")]
    Admin,
    /// View-only operator (`role_id` 2).
    #[serde(rename = "Read Only")]
    ReadOnly,
    /// Manages subscribers, radios, policies and networks (`role_id` 3).
    #[serde(rename = "Network Manager")]
    NetworkManager,
    /// Any other `role_id`.
    #[serde(rename = "Unknown")]
    Unknown,
}

impl RoleLabel {
    /// Every known label with its wire id, in id order.
    pub const KNOWN: [(i64, RoleLabel); 3] = [
        (1, RoleLabel::Admin),
        (2, RoleLabel::ReadOnly),
        (3, RoleLabel::NetworkManager),
    ];

    /// Maps a `role_id` claim to its label.
    pub fn from_role_id(role_id: i64) -> Self {
        match role_id {
            1 => Self::Admin,
            2 => Self::ReadOnly,
            3 => Self::NetworkManager,
            _ => Self::Unknown,
        }
    }

    /// Display label shown in the console header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::ReadOnly => "Read Only",
            Self::NetworkManager => "Network Manager",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether the user-management screens are shown.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether create/update/delete actions are enabled on network
    /// resources (subscribers, radios, policies, data networks, routes).
    pub fn can_edit_network(&self) -> bool {
        matches!(self, Self::Admin | Self::NetworkManager)
    }
}

impl fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
