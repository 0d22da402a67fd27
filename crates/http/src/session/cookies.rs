//! Cookie-backed session store

use super::SessionStore;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use confect_core::TokenPair;
use confect_core::session::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_MAX_AGE_SECS, REFRESH_TOKEN_COOKIE,
    REFRESH_TOKEN_MAX_AGE_SECS,
};
use std::sync::Mutex;
use time::Duration;

fn token_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Removal cookie for the access credential
pub fn clear_access_cookie() -> Cookie<'static> {
    removal_cookie(ACCESS_TOKEN_COOKIE)
}

/// Removal cookie for the refresh credential
pub fn clear_refresh_cookie() -> Cookie<'static> {
    removal_cookie(REFRESH_TOKEN_COOKIE)
}

/// Session store backed by the request's cookie jar
///
/// Wraps the inbound jar; mutations accumulate as pending `Set-Cookie`
/// deltas and ride the response when the session is consumed with
/// [`CookieSession::into_jar`].
pub struct CookieSession {
    jar: Mutex<CookieJar>,
    secure: bool,
}

impl CookieSession {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Self {
            jar: Mutex::new(jar),
            secure,
        }
    }

    /// Consume the session, yielding the jar to attach to the response
    pub fn into_jar(self) -> CookieJar {
        self.jar.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn get_nonempty(&self, name: &str) -> Option<String> {
        let jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        jar.get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl SessionStore for CookieSession {
    fn access_token(&self) -> Option<String> {
        self.get_nonempty(ACCESS_TOKEN_COOKIE)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get_nonempty(REFRESH_TOKEN_COOKIE)
    }

    fn store_pair(&self, pair: TokenPair) {
        let mut jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        *jar = jar
            .clone()
            .add(token_cookie(
                ACCESS_TOKEN_COOKIE,
                &pair.access_token,
                ACCESS_TOKEN_MAX_AGE_SECS,
                self.secure,
            ))
            .add(token_cookie(
                REFRESH_TOKEN_COOKIE,
                &pair.refresh_token,
                REFRESH_TOKEN_MAX_AGE_SECS,
                self.secure,
            ));
    }

    fn clear(&self) {
        let mut jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        *jar = jar
            .clone()
            .add(clear_access_cookie())
            .add(clear_refresh_cookie());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_pair_sets_both_cookies() {
        let session = CookieSession::new(CookieJar::new(), false);
        session.store_pair(TokenPair::new("acc", "ref"));

        assert_eq!(session.access_token().as_deref(), Some("acc"));
        assert_eq!(session.refresh_token().as_deref(), Some("ref"));

        let jar = session.into_jar();
        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(
            access.max_age(),
            Some(Duration::seconds(ACCESS_TOKEN_MAX_AGE_SECS))
        );
    }

    #[test]
    fn clear_removes_both_tokens() {
        let session = CookieSession::new(CookieJar::new(), false);
        session.store_pair(TokenPair::new("acc", "ref"));
        session.clear();

        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn secure_flag_is_applied() {
        let session = CookieSession::new(CookieJar::new(), true);
        session.store_pair(TokenPair::new("acc", "ref"));
        let jar = session.into_jar();
        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().secure(), Some(true));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().secure(), Some(true));
    }
}
