//! Per-user request context
//!
//! The host application forwards the caller's identity and plugin settings as
//! headers. `X-User-Plugins` carries the user's plugin configuration as JSON,
//! e.g. `{"lightrag": {"LIGHTRAG_PROXY_URL": "http://rag.internal:8081"}}`.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use crate::config::{ForwardingTarget, LightragConfig};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_PLUGINS_HEADER: &str = "x-user-plugins";

#[derive(Debug, Default, Deserialize)]
struct UserPlugins {
    #[serde(default)]
    lightrag: Option<LightragPluginSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct LightragPluginSettings {
    #[serde(rename = "LIGHTRAG_PROXY_URL", default)]
    proxy_url: Option<String>,
}

/// Caller identity and per-user LightRAG override
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub user_id: Option<String>,
    pub proxy_url: Option<String>,
}

impl UserContext {
    /// Resolve the LightRAG target for this caller
    pub fn target(&self, config: &LightragConfig) -> ForwardingTarget {
        ForwardingTarget::resolve(self.proxy_url.as_deref(), config)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER).map(str::to_string);

        let proxy_url = header_value(parts, USER_PLUGINS_HEADER).and_then(|raw| {
            match serde_json::from_str::<UserPlugins>(raw) {
                Ok(plugins) => plugins.lightrag.and_then(|settings| settings.proxy_url),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed {} header", USER_PLUGINS_HEADER);
                    None
                }
            }
        });

        Ok(UserContext { user_id, proxy_url })
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> UserContext {
        let (mut parts, _) = request.into_parts();
        UserContext::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_user_override() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-42")
            .header(
                USER_PLUGINS_HEADER,
                r#"{"lightrag": {"LIGHTRAG_PROXY_URL": "http://user-rag:9000"}}"#,
            )
            .body(())
            .unwrap();

        let context = extract(request).await;
        assert_eq!(context.user_id.as_deref(), Some("user-42"));
        assert_eq!(context.proxy_url.as_deref(), Some("http://user-rag:9000"));

        let target = context.target(&LightragConfig::default());
        assert_eq!(target.base_url(), "http://user-rag:9000");
    }

    #[tokio::test]
    async fn test_missing_headers_fall_through() {
        let context = extract(Request::builder().body(()).unwrap()).await;
        assert!(context.user_id.is_none());
        assert!(context.proxy_url.is_none());
    }

    #[tokio::test]
    async fn test_malformed_plugins_header_ignored() {
        let request = Request::builder()
            .header(USER_PLUGINS_HEADER, "{not json")
            .body(())
            .unwrap();

        let context = extract(request).await;
        assert!(context.proxy_url.is_none());
    }

    #[tokio::test]
    async fn test_other_plugins_ignored() {
        let request = Request::builder()
            .header(USER_PLUGINS_HEADER, r#"{"dalle": {"API_KEY": "k"}}"#)
            .body(())
            .unwrap();

        let context = extract(request).await;
        assert!(context.proxy_url.is_none());
    }
}
