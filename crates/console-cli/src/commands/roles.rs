//! Role table listing.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use console_auth::RoleLabel;

/// Role display row
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Wire role id
    role_id: i64,
    /// Label shown in the console
    label: String,
    /// User management screens
    manage_users: bool,
    /// Create/update/delete on network resources
    edit_network: bool,
}

/// Execute the roles command
pub fn execute(format: OutputFormat) {
    let rows: Vec<RoleRow> = RoleLabel::KNOWN
        .iter()
        .map(|(id, role)| RoleRow {
            role_id: *id,
            label: role.to_string(),
            manage_users: role.can_manage_users(),
            edit_network: role.can_edit_network(),
        })
        .collect();

    output::print_list(&rows, format);
}
