use crate::pocketbase::{SUPERUSERS_COLLECTION, USERS_COLLECTION};

/// Which side of the API a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    Admin,
    Client,
}

impl Audience {
    pub fn is_admin(self) -> bool {
        matches!(self, Audience::Admin)
    }

    /// Auth collection accounts of this audience live in
    pub fn auth_collection(self) -> &'static str {
        match self {
            Audience::Admin => SUPERUSERS_COLLECTION,
            Audience::Client => USERS_COLLECTION,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Admin => "admin",
            Audience::Client => "client",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
