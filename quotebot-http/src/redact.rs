//! Log-safe renderings of requests and responses.

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::Deserialize;

/// Cap for raw body logging (64 KiB).
pub(crate) const RAW_MAX_BODY: usize = 64 * 1024;

const SNIPPET_MAX: usize = 500;

const SECRET_PARAMS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

const SECRET_HEADERS: &[&str] = &["authorization", "x-goog-api-key", "cookie"];

fn is_secret_param(name: &str) -> bool {
    SECRET_PARAMS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

fn is_secret_header(name: &str) -> bool {
    SECRET_HEADERS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

pub(crate) fn redact_query(query: &[(&str, &str)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| {
            let shown = if is_secret_param(k) { "<redacted>" } else { v };
            ((*k).to_string(), shown.to_string())
        })
        .collect()
}

pub(crate) fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let val = if is_secret_header(k.as_str()) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (k.as_str().to_string(), val)
        })
        .collect()
}

/// Best-effort curl line for repro. Secret query params are masked in the URL
/// and the auth header is left out.
pub(crate) fn make_curl(method: &Method, url: &Url, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{method}")];
    if body.is_some() {
        parts.push("-H 'content-type: application/json'".to_string());
    }
    if let Some(bytes) = body {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let shown = truncate_on_boundary(s, RAW_MAX_BODY);
                parts.push(format!("-d '{}'", shown.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }

    let mut masked = url.clone();
    if masked.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if is_secret_param(&k) { "<redacted>".into() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        masked.query_pairs_mut().clear().extend_pairs(pairs);
    }
    parts.push(format!("'{masked}'"));
    parts.join(" ")
}

pub(crate) fn snip_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() > SNIPPET_MAX {
        format!("{}...", truncate_on_boundary(&text, SNIPPET_MAX))
    } else {
        text.into_owned()
    }
}

fn truncate_on_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Pull a human-readable message out of the error envelopes our backends use.
pub(crate) fn error_message(body: &[u8]) -> String {
    // Google: {"error":{"code":403,"message":"...","status":"PERMISSION_DENIED"}}
    #[derive(Deserialize)]
    struct GoogleEnv {
        error: GoogleDetail,
    }
    #[derive(Deserialize)]
    struct GoogleDetail {
        message: String,
    }

    // Twitter v2: {"errors":[{"message":"..."}]} or a problem document
    // {"title":"...","detail":"...","type":"..."}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<Problem>,
    }
    #[derive(Deserialize, Default)]
    struct Problem {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
    }

    fn first_non_empty(p: Problem) -> Option<String> {
        [p.message, p.detail, p.title]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    if let Ok(env) = serde_json::from_slice::<GoogleEnv>(body) {
        return env.error.message;
    }
    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(msg) = tw.errors.into_iter().next().and_then(first_non_empty) {
            return msg;
        }
    }
    if let Ok(p) = serde_json::from_slice::<Problem>(body) {
        if let Some(msg) = first_non_empty(p) {
            return msg;
        }
    }
    snip_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn google_error_envelope() {
        let body = br#"{"error":{"code":403,"message":"The caller does not have permission","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(error_message(body), "The caller does not have permission");
    }

    #[test]
    fn twitter_errors_and_problem_documents() {
        let errors = br#"{"errors":[{"message":"You are not allowed to create a Tweet with duplicate content."}]}"#;
        assert_eq!(
            error_message(errors),
            "You are not allowed to create a Tweet with duplicate content."
        );

        let problem = br#"{"title":"Unauthorized","type":"about:blank","status":401,"detail":"Unauthorized"}"#;
        assert_eq!(error_message(problem), "Unauthorized");
    }

    #[test]
    fn unknown_bodies_fall_back_to_snippet() {
        assert_eq!(error_message(b"bad gateway"), "bad gateway");
    }

    #[test]
    fn secrets_are_masked() {
        let q = redact_query(&[("key", "abc"), ("valueRenderOption", "UNFORMATTED_VALUE")]);
        assert_eq!(q[0].1, "<redacted>");
        assert_eq!(q[1].1, "UNFORMATTED_VALUE");

        let mut h = HeaderMap::new();
        h.insert("authorization", HeaderValue::from_static("Bearer s3cret"));
        let shown = redact_headers(&h);
        assert_eq!(shown[0].1, "<redacted>");

        let url = Url::parse("https://sheets.example.com/v4?key=abc&x=1").unwrap();
        let curl = make_curl(&Method::PUT, &url, Some(br#"{"values":[["Yes"]]}"#));
        assert!(!curl.contains("abc"));
        assert!(curl.contains("x=1"));
        assert!(curl.contains("content-type: application/json"));
        assert!(curl.contains(r#"-d '{"values":[["Yes"]]}'"#));
    }

    #[test]
    fn snippets_respect_char_boundaries() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }
}
