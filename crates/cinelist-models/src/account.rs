use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GravatarAvatar {
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TmdbAvatar {
    pub avatar_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountAvatar {
    pub gravatar: GravatarAvatar,
    pub tmdb: TmdbAvatar,
}

/// `/account/{id}` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountDetails {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub include_adult: bool,
    #[serde(rename = "iso6391")]
    pub iso_639_1: String,
    #[serde(rename = "iso31661")]
    pub iso_3166_1: String,
    pub avatar: AccountAvatar,
}

impl AccountDetails {
    /// Name to greet the user with: the display name when set, else the username.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    pub fn avatar_path(&self) -> Option<&str> {
        self.avatar.tmdb.avatar_path.as_deref()
    }
}
