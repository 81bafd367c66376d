//! On-behalf-of token exchange results

use serde_json::Value;

const CONSENT_ERROR_CODES: [&str; 2] = ["invalid_grant", "interaction_required"];

/// Raw answer from the identity provider's token endpoint. Transport failures
/// are represented as a synthesized 400 response by the client adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTokenResponse {
    pub status: u16,
    pub body: Value,
}

impl ProviderTokenResponse {
    pub fn network_failure() -> Self {
        Self {
            status: 400,
            body: serde_json::json!({ "code": 400, "message": "Network error" }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// OAuth2 `error` member, if the body carries one.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccessTokenResult {
    /// Provider token payload, passed through verbatim.
    Granted(Value),
    /// The user must consent or complete MFA interactively.
    ConsentRequired,
    Failed { status: u16, error: Option<String> },
}

impl AccessTokenResult {
    pub fn classify(response: ProviderTokenResponse) -> Self {
        if response.is_success() {
            return AccessTokenResult::Granted(response.body);
        }
        match response.error_code() {
            Some(code) if CONSENT_ERROR_CODES.contains(&code) => AccessTokenResult::ConsentRequired,
            code => AccessTokenResult::Failed {
                status: response.status,
                error: code.map(str::to_string),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> ProviderTokenResponse {
        ProviderTokenResponse { status, body }
    }

    #[test]
    fn test_success_passes_body_through() {
        let body = json!({ "access_token": "graph-token", "expires_in": 3599 });
        assert_eq!(
            AccessTokenResult::classify(response(200, body.clone())),
            AccessTokenResult::Granted(body)
        );
    }

    #[test]
    fn test_consent_codes() {
        for code in ["invalid_grant", "interaction_required"] {
            assert_eq!(
                AccessTokenResult::classify(response(400, json!({ "error": code }))),
                AccessTokenResult::ConsentRequired
            );
        }
    }

    #[test]
    fn test_other_failures() {
        assert_eq!(
            AccessTokenResult::classify(response(401, json!({ "error": "invalid_client" }))),
            AccessTokenResult::Failed { status: 401, error: Some("invalid_client".into()) }
        );
        assert_eq!(
            AccessTokenResult::classify(ProviderTokenResponse::network_failure()),
            AccessTokenResult::Failed { status: 400, error: None }
        );
    }
}
