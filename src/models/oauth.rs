use serde::Deserialize;

// Optional so a bare callback reaches the handler instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

impl CallbackParams {
    pub fn into_parts(self) -> Option<(String, String)> {
        let code = self.code.filter(|c| !c.is_empty())?;
        let state = self.state.filter(|s| !s.is_empty())?;
        Some((code, state))
    }
}

/// Body of GitHub's token endpoint. A denied or expired grant still comes
/// back as HTTP 200, with `error` set instead of `access_token`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
