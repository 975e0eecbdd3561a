//! Actors and their role membership.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    TopAdmin,
    BranchAdmin,
    HumanResources,
    Staff,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "top_admin" => Some(Self::TopAdmin),
            "branch_admin" => Some(Self::BranchAdmin),
            "hr" => Some(Self::HumanResources),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopAdmin => "top_admin",
            Self::BranchAdmin => "branch_admin",
            Self::HumanResources => "hr",
            Self::Staff => "staff",
        }
    }
}

/// An acting identity. The engine compares `id` against a step's designated
/// approver and hands `roles` to the authorization policy; everything else
/// about the person lives outside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            roles: vec![],
        }
    }
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }
}
