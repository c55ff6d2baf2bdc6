//! Cookie-backed session extraction

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::config::SessionConfig;
use crate::domain::{Identity, SessionToken};

/// Name and lifetime of the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub max_age_secs: u64,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, max_age_secs: u64) -> Self {
        Self {
            name: name.into(),
            max_age_secs,
        }
    }

    /// `Set-Cookie` value carrying `token`
    pub fn issue(&self, token: &SessionToken) -> Result<HeaderValue, ApiError> {
        self.header_value(token.as_str(), self.max_age_secs)
    }

    /// `Set-Cookie` value that expires the cookie immediately
    pub fn clear(&self) -> Result<HeaderValue, ApiError> {
        self.header_value("", 0)
    }

    /// Raw token from the request's `Cookie` headers, if present
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn header_value(&self, value: &str, max_age_secs: u64) -> Result<HeaderValue, ApiError> {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, value, max_age_secs
        );

        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal(format!("Invalid cookie value: {}", e)))
    }
}

impl From<&SessionConfig> for SessionCookie {
    fn from(config: &SessionConfig) -> Self {
        Self::new(config.cookie_name.clone(), config.cookie_max_age_secs)
    }
}

/// Extractor that requires a live session cookie
#[derive(Debug, Clone)]
pub struct RequireSession {
    pub identity: Identity,
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state
            .cookie
            .extract(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Not logged in"))?;

        let identity = state.sessions.resolve(&token).ok_or_else(|| {
            debug!("Session cookie did not resolve");
            ApiError::unauthorized("Session expired or invalid")
        })?;

        Ok(RequireSession { identity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie() -> SessionCookie {
        SessionCookie::new("goblog", 50_000)
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; goblog=AbCdEfGhIjKlMnOpQrSt".parse().unwrap(),
        );

        assert_eq!(
            cookie().extract(&headers),
            Some("AbCdEfGhIjKlMnOpQrSt".to_string())
        );
    }

    #[test]
    fn test_extract_across_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, "theme=dark".parse().unwrap());
        headers.append(header::COOKIE, "goblog=token".parse().unwrap());

        assert_eq!(cookie().extract(&headers), Some("token".to_string()));
    }

    #[test]
    fn test_extract_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(cookie().extract(&headers), None);

        headers.insert(header::COOKIE, "goblogx=nope; goblog=".parse().unwrap());
        assert_eq!(cookie().extract(&headers), None);
    }

    #[test]
    fn test_issue_and_clear() {
        let token = SessionToken::new("AbCdEfGhIjKlMnOpQrSt");

        let issued = cookie().issue(&token).unwrap();
        assert_eq!(
            issued,
            "goblog=AbCdEfGhIjKlMnOpQrSt; Path=/; Max-Age=50000; HttpOnly; SameSite=Lax"
        );

        let cleared = cookie().clear().unwrap();
        assert!(cleared.to_str().unwrap().starts_with("goblog=; Path=/; Max-Age=0"));
    }

    #[test]
    fn test_from_session_config() {
        let cookie = SessionCookie::from(&SessionConfig::default());
        assert_eq!(cookie, SessionCookie::new("goblog", 50_000));
    }
}
