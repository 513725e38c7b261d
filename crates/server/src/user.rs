//! Current-user endpoint.

use api_types::{envelope, user::UserProfile};
use axum::{Extension, Json, extract::State};
use engine::User;

use crate::{ServerError, format_timestamp, server::AuthedUser, server::ServerState};

pub(crate) fn profile_view(user: User, login_type: &str) -> UserProfile {
    UserProfile {
        user_id: user.user_id,
        login_type: login_type.to_string(),
        nick_name: user.nick_name,
        avatar_url: user.avatar_url,
        currency: user.currency,
        status: user.status,
        phone: user.phone,
        email: user.email,
        created_at: format_timestamp(user.created_at),
        updated_at: format_timestamp(user.updated_at),
    }
}

/// Return the profile behind the presented token.
pub async fn whoami(
    Extension(auth): Extension<AuthedUser>,
    State(state): State<ServerState>,
) -> Result<Json<envelope::Success<UserProfile>>, ServerError> {
    let user = state.engine.user(&auth.user_id).await?;
    Ok(Json(envelope::Success::new(profile_view(
        user,
        &auth.login_type,
    ))))
}
