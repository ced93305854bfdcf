use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of a successful `POST /auth/login`.
///
/// Older deployments return `token`; newer ones return `accessToken`
/// (plus a refresh token, which is not used).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    token: Option<String>,
    access_token: Option<String>,
    #[serde(default)]
    pub username: String,
    pub id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl LoginResponse {
    /// The session token, preferring `token` over `accessToken`
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or(self.access_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_field() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","username":"u"}"#).unwrap();
        assert_eq!(resp.token(), Some("abc"));
        assert_eq!(resp.username, "u");
    }

    #[test]
    fn test_parse_access_token_field() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"id":1,"username":"emilys","firstName":"Emily","accessToken":"eyJ","refreshToken":"r"}"#,
        )
        .unwrap();
        assert_eq!(resp.token(), Some("eyJ"));
        assert_eq!(resp.first_name.as_deref(), Some("Emily"));
    }

    #[test]
    fn test_missing_token() {
        let resp: LoginResponse = serde_json::from_str(r#"{"username":"u"}"#).unwrap();
        assert_eq!(resp.token(), None);

        let resp: LoginResponse = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert_eq!(resp.token(), None);
    }
}
