//! Login-code exchange and the login endpoint.
//!
//! The provider turns a short-lived login code into a stable `openid`. The
//! call is a single synchronous HTTP round-trip with a hard timeout and no
//! retry; any failure surfaces to the caller in the same request.

use std::time::Duration;

use api_types::{
    envelope,
    user::{LoginRequest, UserProfile},
};
use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, user::profile_view};

/// Hard ceiling on the exchange round-trip.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(8);

const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";

/// Login method recorded in issued tokens.
pub(crate) const LOGIN_TYPE_WX: &str = "wx";

#[derive(Clone)]
pub struct LoginClient {
    http: reqwest::Client,
    appid: String,
    secret: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    openid: Option<String>,
    errmsg: Option<String>,
}

impl LoginClient {
    pub fn new(appid: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::with_api_base(appid, secret, DEFAULT_API_BASE)
    }

    /// Override the provider endpoint; used by tests.
    pub fn with_api_base(
        appid: impl Into<String>,
        secret: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            appid: appid.into(),
            secret: secret.into(),
            api_base: api_base.into(),
        }
    }

    /// Exchange a login code for the stable `openid`.
    pub async fn exchange_code(&self, code: &str) -> Result<String, ServerError> {
        let response = self
            .http
            .get(format!("{}/sns/jscode2session", self.api_base))
            .query(&[
                ("appid", self.appid.as_str()),
                ("secret", self.secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .timeout(EXCHANGE_TIMEOUT)
            .send()
            .await
            .map_err(|err| ServerError::Upstream(format!("login code exchange failed: {err}")))?;

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|err| ServerError::Upstream(format!("login code exchange failed: {err}")))?;

        match session.openid {
            Some(openid) if !openid.is_empty() => Ok(openid),
            _ => Err(ServerError::Upstream(
                session
                    .errmsg
                    .unwrap_or_else(|| "login failed: no openid in response".to_string()),
            )),
        }
    }
}

/// Exchange the login code, resolve the account, issue a bearer token.
pub async fn wxlogin(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<envelope::Login<UserProfile>>, ServerError> {
    if payload.code.trim().is_empty() {
        return Err(ServerError::Generic("code is required".to_string()));
    }

    let openid = state.login.exchange_code(&payload.code).await?;
    let user = state
        .engine
        .resolve_user(
            &openid,
            payload.nick_name.as_deref(),
            payload.avatar_url.as_deref(),
        )
        .await?;

    let token = state.tokens.issue(
        &user.user_id,
        user.nick_name.clone(),
        user.avatar_url.clone(),
        LOGIN_TYPE_WX,
    )?;

    Ok(Json(envelope::Login::new(
        token,
        profile_view(user, LOGIN_TYPE_WX),
    )))
}
