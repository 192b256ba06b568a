//! Mock authentication collaborator.
//!
//! There is no auth backend; one fixed account is accepted after a short
//! artificial delay.

use gloo_timers::future::TimeoutFuture;

use crate::constants::{
    ERR_INVALID_CREDENTIALS, MOCK_ACCESS_TOKEN, MOCK_LOGIN_DELAY_MS, MOCK_PASSWORD,
    MOCK_REFRESH_TOKEN, MOCK_USERNAME,
};
use crate::error::AppError;
use crate::models::{AuthSession, Credentials, User};

pub struct AuthClient;

impl AuthClient {
    pub async fn login(credentials: Credentials) -> Result<AuthSession, AppError> {
        TimeoutFuture::new(MOCK_LOGIN_DELAY_MS).await;
        check_credentials(&credentials)
    }
}

fn mock_user() -> User {
    User {
        id: 1,
        username: MOCK_USERNAME.to_string(),
        email: "kminchelle@dummyjson.com".to_string(),
        first_name: "Kim".to_string(),
        last_name: "Minchelle".to_string(),
        image: Some("https://robohash.org/kminchelle".to_string()),
    }
}

/// Exact match on the one known account.
pub fn check_credentials(credentials: &Credentials) -> Result<AuthSession, AppError> {
    if credentials.username == MOCK_USERNAME && credentials.password == MOCK_PASSWORD {
        Ok(AuthSession {
            user: mock_user(),
            access_token: MOCK_ACCESS_TOKEN.to_string(),
            refresh_token: MOCK_REFRESH_TOKEN.to_string(),
        })
    } else {
        Err(AppError::Auth {
            status: 401,
            message: ERR_INVALID_CREDENTIALS.to_string(),
        })
    }
}
