//! Account Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use std::sync::Arc;

use platform::image_host::ImageHost;
use platform::mailer::Mailer;

use crate::application::config::AccountConfig;
use crate::presentation::handlers::{self, AccountAppState, AccountStore};

/// Profile pictures arrive inline (base64 JSON or multipart)
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create the account router for any store, mailer and image host
pub fn account_router<R, M, I>(repo: R, mailer: M, images: I, config: AccountConfig) -> Router
where
    R: AccountStore,
    M: Mailer + Clone + Sync + 'static,
    I: ImageHost + Clone + Sync + 'static,
{
    let state = AccountAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        images: Arc::new(images),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M, I>))
        .route("/login", post(handlers::sign_in::<R, M, I>))
        .route("/send-otp", post(handlers::send_otp::<R, M, I>))
        .route("/verify-otp", post(handlers::verify_otp::<R, M, I>))
        .route("/reset-password", post(handlers::reset_password::<R, M, I>))
        .route("/profile-setup", post(handlers::profile_setup::<R, M, I>))
        .route("/user-profile", get(handlers::user_profile::<R, M, I>))
        .route(
            "/doctors",
            get(handlers::list_doctors::<R, M, I>).post(handlers::create_doctor::<R, M, I>),
        )
        .route("/doctors/{id}", patch(handlers::update_doctor::<R, M, I>))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
}
