use anyhow::{Context, Result};
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::{Body, Method, Response};
use url::Url;

/// Normalizes an origin like `http://localhost:8080/` to `http://localhost:8080`. `*` is allowed.
pub fn parse_origin(raw: &str) -> Result<String> {
    if raw == "*" {
        return Ok(raw.to_string());
    }
    let url = Url::parse(raw).with_context(|| format!("bad CORS origin {:?}", raw))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("CORS origin {} must be http or https", raw);
    }
    let origin = url.origin();
    if !origin.is_tuple() {
        bail!("CORS origin {} has no host", raw);
    }
    Ok(origin.ascii_serialization())
}

/// Every response allows the configured origin. Preflight requests also learn which methods and
/// headers are fine.
pub fn add_cors_headers(
    resp: &mut Response<Body>,
    method: &Method,
    request_headers: Option<&HeaderValue>,
    origin: &str,
) {
    let headers = resp.headers_mut();
    match HeaderValue::from_str(origin) {
        Ok(value) => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        Err(err) => {
            warn!("Can't send CORS origin {}: {}", origin, err);
        }
    }
    if method == Method::OPTIONS {
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("DELETE, GET, POST, PUT"),
        );
        if let Some(value) = request_headers {
            if !value.is_empty() {
                headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins() {
        assert_eq!(
            "http://localhost:8080",
            parse_origin("http://localhost:8080/").unwrap()
        );
        assert_eq!(
            "https://brandweer.example.nl",
            parse_origin("https://brandweer.example.nl/kaart").unwrap()
        );
        assert_eq!("*", parse_origin("*").unwrap());
        assert!(parse_origin("localhost:8080").is_err());
        assert!(parse_origin("ftp://localhost").is_err());
        assert!(parse_origin("not a url").is_err());
    }

    #[test]
    fn preflight() {
        let mut resp = Response::new(Body::empty());
        let requested = HeaderValue::from_static("content-type, x-requested-with");
        add_cors_headers(
            &mut resp,
            &Method::OPTIONS,
            Some(&requested),
            "http://localhost:8080",
        );
        let headers = resp.headers();
        assert_eq!("http://localhost:8080", headers[ACCESS_CONTROL_ALLOW_ORIGIN]);
        assert_eq!("DELETE, GET, POST, PUT", headers[ACCESS_CONTROL_ALLOW_METHODS]);
        assert_eq!(
            "content-type, x-requested-with",
            headers[ACCESS_CONTROL_ALLOW_HEADERS]
        );
    }

    #[test]
    fn simple_request() {
        let mut resp = Response::new(Body::empty());
        add_cors_headers(&mut resp, &Method::GET, None, "http://localhost:8080");
        let headers = resp.headers();
        assert_eq!("http://localhost:8080", headers[ACCESS_CONTROL_ALLOW_ORIGIN]);
        assert!(headers.get(ACCESS_CONTROL_ALLOW_METHODS).is_none());
        assert!(headers.get(ACCESS_CONTROL_ALLOW_HEADERS).is_none());
    }
}
