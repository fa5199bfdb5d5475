use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub order: u32,
    pub profile_path: Option<String>,
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub job: String,
    pub profile_path: Option<String>,
    pub known_for_department: Option<String>,
}

/// Cast and crew for one movie. Fetched per view, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieCredits {
    pub id: u64,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

impl MovieCredits {
    /// Cast in billing order.
    pub fn billed_cast(&self) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.cast.iter().collect();
        cast.sort_by_key(|member| member.order);
        cast
    }
}
