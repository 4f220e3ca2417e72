//! Client address extraction.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

/// Address of the client that sent the request.
///
/// Taken from the accepted connection when available, otherwise from the
/// first `X-Forwarded-For` entry, otherwise `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddr(pub String);

impl RemoteAddr {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RemoteAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(Self(addr.ip().to_string()));
        }

        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        Ok(Self(forwarded.unwrap_or("unknown").to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RemoteAddr {
        let (mut parts, _) = request.into_parts();
        RemoteAddr::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_connect_info_wins() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .extension(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 41000))))
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.as_str(), "192.0.2.1");
    }

    #[tokio::test]
    async fn test_forwarded_for_first_entry() {
        let request = Request::builder()
            .header("x-forwarded-for", " 203.0.113.9 , 10.0.0.1")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.as_str(), "203.0.113.9");
    }

    #[tokio::test]
    async fn test_unknown() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await.as_str(), "unknown");
    }
}
