//! `HttpDispatcher`: `CommandDispatcher` over the backend's HTTP routes.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use commands::{ClusterPayload, Command, CommandDispatcher, DispatchError};

use crate::{ClientConfig, ClientError};

/// Route that returns the cluster without changing it.
const REFRESH_SEGMENTS: &[&str] = &["noop"];

/// Path segments of the backend route for `command`.
fn command_segments(command: &Command) -> Vec<&str> {
    match command {
        Command::AddNode => vec!["add"],
        Command::PauseNode { node } => vec!["node", node, "pause"],
        Command::PauseAll => vec!["pauseall"],
        Command::ResumeNode { node } => vec!["node", node, "resume"],
        Command::ResumeAll => vec!["resumeall"],
        Command::DestroyNode { node } => vec!["node", node, "stop"],
        Command::DestroyAll => vec!["stopall"],
        Command::StartLoad => vec!["startkv"],
        Command::StopLoad => vec!["stopkv"],
    }
}

/// Backend route for `command`, e.g. `/node/2/pause`.
pub fn command_path(command: &Command) -> String {
    format!("/{}", command_segments(command).join("/"))
}

/// HTTP client for the demo backend.
pub struct HttpDispatcher {
    client: Client,
    base_url: Url,
}

impl HttpDispatcher {
    /// Create a dispatcher for the backend at `config.base_url`.
    ///
    /// # Errors
    /// [`ClientError::InvalidBaseUrl`] unless the URL is absolute http(s);
    /// [`ClientError::Http`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| ClientError::InvalidBaseUrl(config.base_url.clone()))?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path that can be extended.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post(&self, segments: &[&str]) -> Result<ClusterPayload, DispatchError> {
        let url = self.url_for(segments);
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(DispatchError::Rejected { status: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|e| DispatchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CommandDispatcher for HttpDispatcher {
    async fn dispatch(&self, command: &Command) -> Result<ClusterPayload, DispatchError> {
        self.post(&command_segments(command)).await
    }

    async fn refresh(&self) -> Result<ClusterPayload, DispatchError> {
        self.post(REFRESH_SEGMENTS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn one_node(name: &str, paused: bool) -> Value {
        let node = json!({
            "name": name,
            "url": "http://localhost:26001",
            "run": { "id": 1, "Cmd": { "Process": { "Pid": 77 } }, "paused": paused }
        });
        let mut nodes = serde_json::Map::new();
        nodes.insert(name.to_string(), node);
        json!({ "nodes": nodes, "kv": "" })
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/noop", post(|| async { Json(json!({ "nodes": {}, "kv": "" })) }))
            .route("/add", post(|| async { Json(one_node("1", false)) }))
            .route(
                "/node/:node/pause",
                post(|Path(node): Path<String>| async move { Json(one_node(&node, true)) }),
            )
            .route(
                "/stopall",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "cluster on fire") }),
            )
            .route("/startkv", post(|| async { "definitely not json" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn dispatcher(base_url: String) -> HttpDispatcher {
        HttpDispatcher::new(&ClientConfig { base_url, ..ClientConfig::default() }).unwrap()
    }

    #[test]
    fn routes_match_backend() {
        assert_eq!(command_path(&Command::AddNode), "/add");
        assert_eq!(command_path(&Command::pause("2")), "/node/2/pause");
        assert_eq!(command_path(&Command::resume("2")), "/node/2/resume");
        assert_eq!(command_path(&Command::destroy("2")), "/node/2/stop");
        assert_eq!(command_path(&Command::PauseAll), "/pauseall");
        assert_eq!(command_path(&Command::ResumeAll), "/resumeall");
        assert_eq!(command_path(&Command::DestroyAll), "/stopall");
        assert_eq!(command_path(&Command::StartLoad), "/startkv");
        assert_eq!(command_path(&Command::StopLoad), "/stopkv");
    }

    #[test]
    fn node_names_are_escaped_into_a_single_segment() {
        let d = dispatcher("http://localhost:9999".into());
        let url = d.url_for(&command_segments(&Command::destroy("../stopall")));
        assert_eq!(url.as_str(), "http://localhost:9999/node/..%2Fstopall/stop");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig { base_url: "localhost:9999".into(), ..ClientConfig::default() };
        assert!(matches!(HttpDispatcher::new(&config), Err(ClientError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn decodes_cluster_from_backend() {
        let d = dispatcher(spawn_backend().await);

        assert!(d.refresh().await.unwrap().nodes.is_empty());

        let added = d.dispatch(&Command::AddNode).await.unwrap();
        assert_eq!(added.nodes["1"].pid(), Some(77));

        let paused = d.dispatch(&Command::pause("4")).await.unwrap();
        assert!(paused.nodes["4"].paused());
    }

    #[tokio::test]
    async fn maps_backend_failures() {
        let d = dispatcher(spawn_backend().await);

        let rejected = d.dispatch(&Command::DestroyAll).await.unwrap_err();
        assert_eq!(
            rejected,
            DispatchError::Rejected { status: 500, body: "cluster on fire".into() }
        );

        let garbled = d.dispatch(&Command::StartLoad).await.unwrap_err();
        assert!(matches!(garbled, DispatchError::Decode(_)));

        let missing = d.dispatch(&Command::StopLoad).await.unwrap_err();
        assert!(matches!(missing, DispatchError::Rejected { status: 404, .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let d = dispatcher(format!("http://{addr}"));
        assert!(matches!(d.refresh().await, Err(DispatchError::Transport(_))));
    }
}
