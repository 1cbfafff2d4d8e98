//! Member record.
//!
//! Contact fields carry no uniqueness constraints; identity is the id alone.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable identifier for a member record.
pub type MemberId = Uuid;

/// One registered borrower.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable id used by loans to reference this member.
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Member {
    /// Creates a member with a generated id.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
