// League and membership domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named group of members with one designated admin. Owns its members
/// and pools; deleting a league cascades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub admin_member_id: Option<i64>,
}

/// Invitation lifecycle: members are created pending and activate on
/// acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Pending,
    Active,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Active => "active",
        }
    }

    pub fn from_str_status(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MemberStatus::Pending),
            "active" => Some(MemberStatus::Active),
            _ => None,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }

    pub fn from_str_role(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(MemberRole::Admin),
            "member" => Some(MemberRole::Member),
            _ => None,
        }
    }
}

/// A league participant. At most one team per pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
    pub email: String,
    pub status: MemberStatus,
    pub role: MemberRole,
}

/// One member's roster within one pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub pool_id: i64,
    pub member_id: i64,
    pub name: String,
}
