use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatus {
    pub logged_in: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StarredListResponse {
    pub authed: bool,
    // Passed through untouched.
    pub repos: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StarredListResponse {
    pub fn unauthed(error: Option<String>) -> Self {
        Self {
            authed: false,
            repos: Value::Array(Vec::new()),
            error,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StarRequest {
    pub owner: Option<String>,
    pub repo: Option<String>,
}

impl StarRequest {
    pub fn into_target(self) -> Option<(String, String)> {
        let owner = self.owner.filter(|o| !o.is_empty())?;
        let repo = self.repo.filter(|r| !r.is_empty())?;
        Some((owner, repo))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StarResponse {
    pub ok: bool,
    pub count: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
