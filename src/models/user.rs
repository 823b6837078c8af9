//! User and role data structures.
//!
//! Credentials are mock: there is no real authentication model. The role
//! gates which dispatchers a session may invoke.

use serde::{Deserialize, Serialize};

/// Session role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Faculty,
}

/// The user owning a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    pub name: String,

    pub email: String,

    pub role: Role,

    pub institution_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
        assert_eq!(serde_json::to_string(&Role::Faculty).unwrap(), "\"FACULTY\"");
    }
}
