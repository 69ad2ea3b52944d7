use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. Sign-in providers populate these fields; this
/// application only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
}

/// The public slice of a user shown next to their to-dos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    pub id: i64,
    pub display_name: String,
    pub image: Option<String>,
}

impl From<&User> for Owner {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            display_name: u.display_name.clone(),
            image: u.image.clone(),
        }
    }
}
