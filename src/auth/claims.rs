use serde::{Deserialize, Serialize};

/// Identity fields copied from an auth record into the session token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub email_visibility: bool,
    pub verified: bool,
    pub name: String,
    pub avatar: String,
    pub is_active: bool,
    pub is_admin_user: bool,
    #[serde(alias = "roles", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

impl UserProfile {
    /// Copy the known fields of a record; unknown fields are dropped.
    ///
    /// Admin profiles always carry `role` and `permissions`; client profiles never do.
    pub fn from_record<T: Serialize>(record: &T, admin: bool) -> Result<Self, serde_json::Error> {
        let mut profile: UserProfile = serde_json::from_value(serde_json::to_value(record)?)?;
        profile.is_admin_user = admin;
        if admin {
            profile.role.get_or_insert_with(String::new);
            profile.permissions.get_or_insert_with(String::new);
        } else {
            profile.role = None;
            profile.permissions = None;
        }
        Ok(profile)
    }
}

/// What gets signed: the profile plus the embedded external token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub ext_token: String,
}

/// A verified session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub session: SessionPayload,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}
