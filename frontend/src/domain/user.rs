//! Public user profile served by the API and the identity provider.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Optional structured profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Given name.
    #[serde(default)]
    pub firstname: Option<String>,
    /// Family name.
    #[serde(default)]
    pub lastname: Option<String>,
    /// Job title.
    #[serde(default)]
    pub job: Option<String>,
}

/// Display data for a user, keyed by the provider-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-assigned identifier.
    pub user_id: UserId,
    /// Display name chosen by the provider.
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// Optional structured metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

impl UserProfile {
    /// Full name from metadata when both parts are present, else the display name.
    ///
    /// # Examples
    /// ```
    /// use frontend::domain::{UserId, UserMetadata, UserProfile};
    ///
    /// let profile = UserProfile {
    ///     user_id: UserId::new("u"),
    ///     name: "ada@example.com".to_owned(),
    ///     picture: None,
    ///     user_metadata: Some(UserMetadata {
    ///         firstname: Some("Ada".to_owned()),
    ///         lastname: Some("Lovelace".to_owned()),
    ///         job: None,
    ///     }),
    /// };
    /// assert_eq!(profile.display_name(), "Ada Lovelace");
    /// ```
    pub fn display_name(&self) -> String {
        match &self.user_metadata {
            Some(UserMetadata {
                firstname: Some(first),
                lastname: Some(last),
                ..
            }) => format!("{first} {last}"),
            _ => self.name.clone(),
        }
    }
}
