//! Route guard: gate page navigation on credential presence
//!
//! Runs ahead of every handler. Only inspects cookies, never the
//! network, so it is cheap enough for every navigation. Validating the
//! access token against the upstream is the gateway's job downstream.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use confect_core::session::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

use crate::session::clear_access_cookie;

/// Sign-in page unauthenticated traffic is redirected to
pub const SIGNIN_PATH: &str = "/auth/signin";

/// Paths that never require credentials
const PUBLIC_PATHS: &[&str] = &[
    "/auth/signin",
    "/auth/signup",
    "/auth/reset-password",
    "/health",
];

/// Prefixes that handle authentication themselves
const PUBLIC_PREFIXES: &[&str] = &["/api/", "/docs"];

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || path.ends_with(".js")
        || path.ends_with(".css")
        || path.ends_with(".ico")
}

fn signin_redirect(original_path: &str) -> Redirect {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", original_path)
        .finish();
    Redirect::temporary(&format!("{SIGNIN_PATH}?{query}"))
}

fn cookie_present(jar: &CookieJar, name: &str) -> bool {
    jar.get(name).is_some_and(|c| !c.value().is_empty())
}

/// Middleware gating page navigation
pub async fn route_guard(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if is_public(&path) {
        return next.run(req).await;
    }

    let jar = CookieJar::from_headers(req.headers());
    let has_access = cookie_present(&jar, ACCESS_TOKEN_COOKIE);
    let has_refresh = cookie_present(&jar, REFRESH_TOKEN_COOKIE);

    if has_refresh {
        return next.run(req).await;
    }

    debug!("Unauthenticated navigation to {path}, redirecting to sign-in");
    let redirect = signin_redirect(&path);

    if has_access {
        // Access token without refresh token: a stale partial session
        // from a failed cleanup or tampering. Clear it on the way out.
        return (jar.add(clear_access_cookie()), redirect).into_response();
    }

    redirect.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_pass() {
        assert!(is_public("/auth/signin"));
        assert!(is_public("/auth/signup"));
        assert!(is_public("/auth/reset-password"));
        assert!(is_public("/api/products"));
        assert!(is_public("/health"));
        assert!(is_public("/docs"));
        assert!(is_public("/app.css"));
    }

    #[test]
    fn pages_are_guarded() {
        assert!(!is_public("/dashboard"));
        assert!(!is_public("/orders"));
        assert!(!is_public("/"));
    }
}
