//! Viewer role resolution.

use crate::model::house::UserId;
use serde::{Deserialize, Serialize};

/// How the current viewer relates to a house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// The signed-in user owns the house.
    Owner,
    /// Anyone else, including anonymous viewers.
    Visitor,
}

impl UserRole {
    /// Resolves the viewer role from the house owner and the identity
    /// service's current user.
    pub fn resolve(owner_id: UserId, current_user: Option<UserId>) -> Self {
        match current_user {
            Some(user_id) if user_id == owner_id => Self::Owner,
            _ => Self::Visitor,
        }
    }

    pub fn is_owner(self) -> bool {
        self == Self::Owner
    }
}

#[cfg(test)]
mod tests {
    use super::UserRole;
    use uuid::Uuid;

    #[test]
    fn owner_only_when_ids_match() {
        let owner = Uuid::new_v4();
        assert_eq!(UserRole::resolve(owner, Some(owner)), UserRole::Owner);
        assert_eq!(
            UserRole::resolve(owner, Some(Uuid::new_v4())),
            UserRole::Visitor
        );
        assert_eq!(UserRole::resolve(owner, None), UserRole::Visitor);
    }
}
