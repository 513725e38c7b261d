use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{LoginClient, ServerError, TokenIssuer, categories, login, records, summaries, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: TokenIssuer,
    pub login: LoginClient,
}

/// The identity the auth middleware resolved from the bearer token.
#[derive(Clone, Debug)]
pub struct AuthedUser {
    pub user_id: String,
    pub login_type: String,
}

async fn auth(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(bearer)) = bearer else {
        return Err(ServerError::Unauthorized(
            "missing bearer token".to_string(),
        ));
    };

    let claims = state.tokens.verify(bearer.token())?;
    request.extensions_mut().insert(AuthedUser {
        user_id: claims.user_id,
        login_type: claims.login_type,
    });

    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/whoami", get(user::whoami))
        .route(
            "/api/categories",
            get(categories::list).post(categories::add),
        )
        .route(
            "/api/categories/{id}",
            axum::routing::patch(categories::update).delete(categories::remove),
        )
        .route("/api/records", get(records::list).post(records::add))
        .route(
            "/api/records/{id}",
            get(records::get_detail)
                .patch(records::update)
                .delete(records::remove),
        )
        .route("/api/records/{id}/restore", post(records::restore))
        .route("/api/summary/day", get(summaries::day))
        .route("/api/summary/month", get(summaries::month))
        .route("/api/summary/calendar", get(summaries::calendar))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/api/wxlogin", post(login::wxlogin))
        .with_state(state)
}

pub async fn run(engine: Engine, tokens: TokenIssuer, login: LoginClient) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, tokens, login, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenIssuer,
    login: LoginClient,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens,
        login,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    tokens: TokenIssuer,
    login: LoginClient,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, tokens, login, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
