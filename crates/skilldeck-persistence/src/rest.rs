//! Supabase-compatible remote backend
//!
//! Auth goes through GoTrue (`/auth/v1/*`), bookmarks through PostgREST
//! row-level CRUD on `/rest/v1/user_bookmarks`.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use skilldeck_types::{SkillId, User, UserId};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{BackendError, Result};
use crate::{BookmarkStore, IdentityProvider};

const BOOKMARKS_TABLE: &str = "user_bookmarks";

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        User::new(user.id, user.email)
    }
}

/// Token grant. Sign-up returns the same shape when the project auto-confirms
/// accounts, or a bare user object when email confirmation is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthResponse {
    Session {
        access_token: String,
        user: AuthUser,
    },
    UserOnly(AuthUser),
}

#[derive(Debug, Deserialize)]
struct BookmarkRow {
    skill_id: SkillId,
}

#[derive(Debug, Clone)]
struct Session {
    access_token: String,
    user: User,
}

/// Client for a Supabase project
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Remote backend configured at {}", base_url);
        Self {
            client: Client::new(),
            base_url,
            anon_key: anon_key.into(),
            session: RwLock::new(None),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, BOOKMARKS_TABLE)
    }

    /// Attach the project key and the best available bearer token
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        };
        request.header("apikey", &self.anon_key).bearer_auth(token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.authorize(request)
            .await
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode_auth(response: Response) -> Result<AuthResponse> {
        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// Store the session if the response carried one and return the user
    async fn adopt(&self, auth: AuthResponse) -> User {
        match auth {
            AuthResponse::Session { access_token, user } => {
                let user = User::from(user);
                *self.session.write().await = Some(Session {
                    access_token,
                    user: user.clone(),
                });
                user
            }
            AuthResponse::UserOnly(user) => {
                debug!("Sign-up returned no session; confirmation pending");
                User::from(user)
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for RestBackend {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.session.read().await.as_ref().map(|s| s.user.clone()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let response = self.send(request).await?;
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(BackendError::InvalidCredentials);
        }

        let auth = Self::decode_auth(Self::check(response).await?).await?;
        let user = self.adopt(auth).await;
        info!("Signed in as {}", user.id);
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let request = self
            .client
            .post(self.auth_url("signup"))
            .json(&json!({ "email": email, "password": password }));

        let response = self.send(request).await?;
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(BackendError::AccountExists(email.to_string()));
        }

        let auth = Self::decode_auth(Self::check(response).await?).await?;
        let user = self.adopt(auth).await;
        info!("Registered remote account {}", user.id);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        if self.session.read().await.is_none() {
            return Ok(());
        }

        let request = self.client.post(self.auth_url("logout"));
        let outcome = match self.send(request).await {
            Ok(response) => Self::check(response).await.map(|_| ()),
            Err(e) => Err(e),
        };

        // the local session goes away regardless of what the server said
        *self.session.write().await = None;
        if let Err(e) = outcome {
            warn!("Remote sign-out failed: {}", e);
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for RestBackend {
    async fn list_bookmarks(&self, user_id: &UserId) -> Result<HashSet<SkillId>> {
        let request = self.client.get(self.table_url()).query(&[
            ("select", "skill_id".to_string()),
            ("user_id", format!("eq.{}", user_id)),
        ]);

        let response = Self::check(self.send(request).await?).await?;
        let rows: Vec<BookmarkRow> = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        debug!("Fetched {} bookmarks for {}", rows.len(), user_id);
        Ok(rows.into_iter().map(|row| row.skill_id).collect())
    }

    async fn add_bookmark(&self, user_id: &UserId, skill_id: SkillId) -> Result<()> {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(&json!({ "user_id": user_id, "skill_id": skill_id }));

        Self::check(self.send(request).await?).await?;
        Ok(())
    }

    async fn remove_bookmark(&self, user_id: &UserId, skill_id: SkillId) -> Result<()> {
        let request = self.client.delete(self.table_url()).query(&[
            ("user_id", format!("eq.{}", user_id)),
            ("skill_id", format!("eq.{}", skill_id)),
        ]);

        Self::check(self.send(request).await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANON: &str = "anon-key";

    fn session_body() -> serde_json::Value {
        json!({
            "access_token": "user-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": { "id": "u-1", "email": "dev@example.com" }
        })
    }

    async fn signed_in(server: &MockServer) -> RestBackend {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .mount(server)
            .await;

        let backend = RestBackend::new(server.uri(), ANON);
        backend.sign_in("dev@example.com", "pw").await.unwrap();
        backend
    }

    #[tokio::test]
    async fn test_sign_in_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", ANON))
            .and(header("authorization", "Bearer anon-key"))
            .and(body_json(json!({ "email": "dev@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .expect(1)
            .mount(&server)
            .await;

        let backend = RestBackend::new(format!("{}/", server.uri()), ANON);
        let user = backend.sign_in("dev@example.com", "pw").await.unwrap();

        assert_eq!(user, User::new("u-1", Some("dev@example.com".into())));
        assert_eq!(backend.current_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .mount(&server)
            .await;

        let backend = RestBackend::new(server.uri(), ANON);
        assert!(matches!(
            backend.sign_in("dev@example.com", "nope").await,
            Err(BackendError::InvalidCredentials)
        ));
        assert!(backend.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_pending_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "u-2", "email": "new@example.com" })),
            )
            .mount(&server)
            .await;

        let backend = RestBackend::new(server.uri(), ANON);
        let user = backend.sign_up("new@example.com", "pw").await.unwrap();
        assert_eq!(user.id.as_str(), "u-2");
        assert!(backend.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_existing_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let backend = RestBackend::new(server.uri(), ANON);
        assert!(matches!(
            backend.sign_up("dev@example.com", "pw").await,
            Err(BackendError::AccountExists(_))
        ));
    }

    #[tokio::test]
    async fn test_bookmarks_use_session_token() {
        let server = MockServer::start().await;
        let backend = signed_in(&server).await;
        let user = UserId::new("u-1");

        Mock::given(method("GET"))
            .and(path("/rest/v1/user_bookmarks"))
            .and(query_param("select", "skill_id"))
            .and(query_param("user_id", "eq.u-1"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "skill_id": 2 }, { "skill_id": 7 }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/user_bookmarks"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(json!({ "user_id": "u-1", "skill_id": 3 })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/user_bookmarks"))
            .and(query_param("user_id", "eq.u-1"))
            .and(query_param("skill_id", "eq.7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            backend.list_bookmarks(&user).await.unwrap(),
            HashSet::from([2, 7])
        );
        backend.add_bookmark(&user, 3).await.unwrap();
        backend.remove_bookmark(&user, 7).await.unwrap();
    }

    #[tokio::test]
    async fn test_bookmark_failure_is_reported() {
        let server = MockServer::start().await;
        let backend = signed_in(&server).await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/user_bookmarks"))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key"))
            .mount(&server)
            .await;

        let err = backend
            .add_bookmark(&UserId::new("u-1"), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Http { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_even_on_error() {
        let server = MockServer::start().await;
        let backend = signed_in(&server).await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        backend.sign_out().await.unwrap();
        assert!(backend.current_user().await.unwrap().is_none());

        // already signed out: no request
        backend.sign_out().await.unwrap();
    }
}
