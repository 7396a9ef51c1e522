//! REST client for the Firebase identity and realtime-database services.
//!
//! Auth goes through the identitytoolkit endpoints (`accounts:signInWithPassword`,
//! `accounts:signUp`) and securetoken for refresh; records live under
//! `users/{uid}/notes/{id}.json` in the realtime database, authorized by the
//! session's id token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{RecordBackend, Session};
use crate::config::Config;
use crate::errors::{AuthError, BackendError};

pub struct FirebaseBackend {
    api_key: String,
    auth_url: String,
    token_url: String,
    database_url: String,
    client: reqwest::Client,
}

// ── Wire types ──────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Sign-in and sign-up response (identitytoolkit, camelCase keys).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    /// Lifetime in seconds, sent as a string.
    expires_in: String,
}

/// Refresh response (securetoken, snake_case keys).
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

// ── Client impl ─────────────────────────────────────

impl FirebaseBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.firebase_api_key.clone(),
            auth_url: config.firebase_auth_url.trim_end_matches('/').to_string(),
            token_url: config.firebase_token_url.trim_end_matches('/').to_string(),
            database_url: config.firebase_database_url.trim_end_matches('/').to_string(),
            client: crate::http::shared_client().clone(),
        }
    }

    fn sign_in_url(&self) -> String {
        format!("{}/accounts:signInWithPassword?key={}", self.auth_url, self.api_key)
    }

    fn sign_up_url(&self) -> String {
        format!("{}/accounts:signUp?key={}", self.auth_url, self.api_key)
    }

    fn refresh_url(&self) -> String {
        format!("{}/token?key={}", self.token_url, self.api_key)
    }

    fn record_url(&self, user_id: &str, note_id: &str, id_token: &str) -> String {
        format!(
            "{}/users/{}/notes/{}.json?auth={}",
            self.database_url, user_id, note_id, id_token
        )
    }

    fn collection_url(&self, user_id: &str, id_token: &str) -> String {
        format!("{}/users/{}/notes.json?auth={}", self.database_url, user_id, id_token)
    }

    /// POST credentials to an identity endpoint and build a session from the
    /// response. Shared by sign-in and sign-up, which differ only in URL.
    async fn credentials_request(
        &self,
        url: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let body = CredentialsBody {
            email,
            password,
            return_secure_token: true,
        };

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(auth_rejection(status.as_u16(), &text));
        }

        let parsed: AuthResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::Rejected(format!("Invalid auth response: {}", e)))?;

        Ok(session_from(
            parsed.local_id,
            parsed.id_token,
            parsed.refresh_token,
            &parsed.expires_in,
        ))
    }
}

#[async_trait]
impl RecordBackend for FirebaseBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        log::info!("[Firebase] Signing in {}", email);
        self.credentials_request(&self.sign_in_url(), email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        log::info!("[Firebase] Registering {}", email);
        self.credentials_request(&self.sign_up_url(), email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        log::debug!("[Firebase] Exchanging refresh token");

        let resp = self
            .client
            .post(self.refresh_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(auth_rejection(status.as_u16(), &text));
        }

        let parsed: RefreshResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::Rejected(format!("Invalid refresh response: {}", e)))?;

        Ok(session_from(
            parsed.user_id,
            parsed.id_token,
            parsed.refresh_token,
            &parsed.expires_in,
        ))
    }

    async fn put_record(
        &self,
        session: &Session,
        note_id: &str,
        record: &serde_json::Value,
    ) -> Result<(), BackendError> {
        log::debug!("[Firebase] PUT note {} for {}", note_id, session.user_id);

        let url = self.record_url(&session.user_id, note_id, &session.id_token);
        let resp = self
            .client
            .put(url)
            .json(record)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        check_record_response(resp).await.map(|_| ())
    }

    async fn list_records(&self, session: &Session) -> Result<Vec<serde_json::Value>, BackendError> {
        log::debug!("[Firebase] GET notes for {}", session.user_id);

        let url = self.collection_url(&session.user_id, &session.id_token);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let text = check_record_response(resp).await?;

        // An empty collection comes back as a literal `null`.
        let map: Option<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&text)
            .map_err(|e| BackendError::Network(format!("Invalid collection response: {}", e)))?;

        Ok(map
            .map(|m| m.into_iter().map(|(_, v)| v).collect())
            .unwrap_or_default())
    }

    async fn delete_record(&self, session: &Session, note_id: &str) -> Result<(), BackendError> {
        log::debug!("[Firebase] DELETE note {} for {}", note_id, session.user_id);

        let url = self.record_url(&session.user_id, note_id, &session.id_token);
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        check_record_response(resp).await.map(|_| ())
    }
}

// ── Response handling ───────────────────────────────

/// Read the body, mapping non-2xx onto `BackendError::Rejected`.
async fn check_record_response(resp: reqwest::Response) -> Result<String, BackendError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;

    if status.is_success() {
        Ok(text)
    } else {
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message: record_error_message(&text),
        })
    }
}

/// The database reports errors as `{"error": "message"}`; fall back to the
/// raw body when the shape is anything else.
fn record_error_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        "no error detail".to_string()
    } else {
        message
    }
}

/// Map an identity-service rejection body onto the auth taxonomy.
fn auth_rejection(status: u16, body: &str) -> AuthError {
    match auth_error_code(body) {
        Some(code) => map_auth_code(&code),
        None => AuthError::Rejected(format!("HTTP {}: {}", status, body.trim())),
    }
}

/// Identity endpoints nest the code as `{"error": {"message": "..."}}`.
fn auth_error_code(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn map_auth_code(code: &str) -> AuthError {
    match code {
        "EMAIL_NOT_FOUND" => AuthError::AccountNotFound,
        "INVALID_PASSWORD" | "INVALID_EMAIL" | "INVALID_LOGIN_CREDENTIALS" => {
            AuthError::InvalidCredentials
        }
        "EMAIL_EXISTS" => AuthError::AccountExists,
        _ if code.starts_with("WEAK_PASSWORD") => AuthError::WeakPassword(code.to_string()),
        _ => AuthError::Rejected(code.to_string()),
    }
}

fn session_from(user_id: String, id_token: String, refresh_token: String, expires_in: &str) -> Session {
    let ttl = expires_in.parse::<i64>().unwrap_or(3600);
    Session {
        user_id,
        id_token,
        refresh_token,
        expires_at: chrono::Utc::now().timestamp() + ttl,
    }
}
