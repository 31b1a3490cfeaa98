use axum::extract::{Request, State};
use axum::http::header::{
    REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use axum::http::{HeaderValue, Uri, uri::PathAndQuery};
use axum::middleware::Next;
use axum::response::Response;

use crate::bootstrap::app_context::AppContext;

/// Standard security response headers. HSTS is withheld in development where
/// the client talks plain HTTP.
pub async fn security_headers(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    if !ctx.cfg.is_development() {
        headers.insert(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        );
    }
    res
}

/// Parameter-pollution scrub: a query key supplied more than once collapses
/// to its last occurrence before any handler sees the request.
pub async fn scrub_duplicate_params(mut req: Request, next: Next) -> Response {
    if let Some(query) = req.uri().query() {
        if let Some(clean) = dedupe_query(query) {
            let path = req.uri().path();
            let pq = if clean.is_empty() {
                path.to_string()
            } else {
                format!("{path}?{clean}")
            };
            let mut parts = req.uri().clone().into_parts();
            if let Ok(pq) = PathAndQuery::try_from(pq.as_str()) {
                parts.path_and_query = Some(pq);
                if let Ok(uri) = Uri::from_parts(parts) {
                    *req.uri_mut() = uri;
                }
            }
        }
    }
    next.run(req).await
}

// Returns None when the query is already free of duplicates.
fn dedupe_query(query: &str) -> Option<String> {
    let pairs: Vec<(&str, Option<&str>)> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (p, None),
        })
        .collect();

    let mut kept: Vec<(&str, Option<&str>)> = Vec::with_capacity(pairs.len());
    let mut duplicated = false;
    for (key, value) in pairs {
        if let Some(existing) = kept.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
            duplicated = true;
        } else {
            kept.push((key, value));
        }
    }
    if !duplicated {
        return None;
    }
    Some(
        kept.into_iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{k}={v}"),
                None => k.to_string(),
            })
            .collect::<Vec<_>>()
            .join("&"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_queries_pass_untouched() {
        assert_eq!(dedupe_query("a=1&b=2"), None);
        assert_eq!(dedupe_query(""), None);
        assert_eq!(dedupe_query("flag"), None);
    }

    #[test]
    fn duplicates_keep_the_last_value() {
        assert_eq!(dedupe_query("a=1&a=2"), Some("a=2".into()));
        assert_eq!(dedupe_query("a=1&b=x&a=3"), Some("a=3&b=x".into()));
    }

    #[test]
    fn valueless_keys_participate_in_dedup() {
        assert_eq!(dedupe_query("a&a=2"), Some("a=2".into()));
        assert_eq!(dedupe_query("a=1&a"), Some("a".into()));
    }
}
