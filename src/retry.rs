//! Authenticated calls with a single refresh-and-retry on 401
//!
//! A call runs with the current token. If the backend answers 401 the session
//! is refreshed once and the call is repeated with the new token; whatever the
//! second attempt returns is final. Any other failure is returned as is.
//! When a concurrent call has already replaced the rejected token, the retry
//! uses that token and no second refresh happens.

use std::future::Future;

use crate::auth::SessionManager;
use crate::error::{Error, Result};

/// Run `call` with the session token, refreshing and retrying once on 401.
///
/// Fails with `NotAuthenticated` without calling when there is no session,
/// and with `SessionExpired` when the refresh does not succeed.
pub async fn with_session<T, F, Fut>(session: &SessionManager, mut call: F) -> Result<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let token = session.token().await.ok_or(Error::NotAuthenticated)?;

    match call(token.clone()).await {
        Err(e) if e.is_unauthorized() => {
            tracing::info!("Token rejected by backend, refreshing session");

            let refreshed = session
                .refresh_rejected(&token)
                .await
                .ok_or(Error::SessionExpired)?;
            let token = refreshed
                .token()
                .map(str::to_string)
                .ok_or(Error::SessionExpired)?;

            tracing::debug!("Retrying with refreshed token");
            call(token).await
        }
        outcome => outcome,
    }
}
