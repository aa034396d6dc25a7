//! Request routing for the HTTP API

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use chrono::Utc;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;
use utena_protocol::{
    OkResponse, PluginCommand, SessionListResponse, SessionRequest, SessionsSnapshot,
    WorkspaceListResponse,
};
use utena_utils::Result;

use super::response::{self, HttpResponse};
use crate::app::AppState;
use crate::bus::Event;
use crate::context::RequestContext;

/// Handle an HTTP request
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> std::result::Result<HttpResponse, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = Uuid::new_v4();
    debug!(%request_id, %method, %path, "HTTP request");

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let ctx = state.request_context();

    let response = match (&method, segments.as_slice()) {
        (&Method::GET, ["health"]) => response::text(StatusCode::OK, "OK"),

        (&Method::GET, ["workspaces"]) => response::json(
            StatusCode::OK,
            &WorkspaceListResponse {
                workspaces: state.workspaces.list(),
            },
        ),
        (&Method::GET, ["workspaces", id]) => {
            respond(StatusCode::OK, state.workspaces.get(id))
        }

        (&Method::GET, ["sessions"]) => response::json(
            StatusCode::OK,
            &SessionListResponse {
                sessions: state.sessions.list_sessions(),
            },
        ),
        (&Method::POST, ["sessions"]) => create_session(req, &state, &ctx).await,
        (&Method::GET, ["sessions", "workspace", workspace_id]) => respond(
            StatusCode::OK,
            state
                .sessions
                .list_sessions_by_workspace(workspace_id)
                .map(|sessions| SessionListResponse { sessions }),
        ),
        (&Method::GET, ["sessions", id]) => respond(StatusCode::OK, state.sessions.get_session(id)),
        (&Method::PUT, ["sessions", id]) => {
            let id = id.to_string();
            update_session(req, &state, &ctx, id).await
        }
        (&Method::DELETE, ["sessions", id]) => {
            respond_empty(state.sessions.delete_session(&ctx, id).map(|_| ()))
        }
        (&Method::POST, ["sessions", id, "touch"]) => {
            respond_empty(state.sessions.touch_session(&ctx, id).map(|_| ()))
        }

        (&Method::PUT, ["zellij", "sessions"]) => report_sessions(req, &state, &ctx).await,
        (&Method::POST, ["zellij", "commands"]) => send_command(req, &state, &ctx).await,

        _ => response::not_found(),
    };

    debug!(%request_id, status = response.status().as_u16(), "HTTP response");
    Ok(response)
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T>) -> HttpResponse {
    match result {
        Ok(body) => response::json(status, &body),
        Err(e) => response::from_error(&e),
    }
}

fn respond_empty(result: Result<()>) -> HttpResponse {
    match result {
        Ok(()) => response::empty(StatusCode::NO_CONTENT),
        Err(e) => response::from_error(&e),
    }
}

/// Read and decode a JSON body; the error is a ready 400 response
async fn read_json<B, T>(req: Request<B>) -> std::result::Result<T, HttpResponse>
where
    B: Body,
    B::Error: Display,
    T: DeserializeOwned,
{
    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|e| response::bad_request(&format!("failed to read body: {e}")))?
        .to_bytes();

    serde_json::from_slice(&bytes)
        .map_err(|e| response::bad_request(&format!("invalid JSON body: {e}")))
}

async fn create_session<B>(req: Request<B>, state: &AppState, ctx: &RequestContext) -> HttpResponse
where
    B: Body,
    B::Error: Display,
{
    let body: SessionRequest = match read_json(req).await {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };

    let session = body.into_session(Utc::now());
    respond(
        StatusCode::CREATED,
        state.sessions.create_session_and_notify(ctx, session).await,
    )
}

async fn update_session<B>(
    req: Request<B>,
    state: &AppState,
    ctx: &RequestContext,
    id: String,
) -> HttpResponse
where
    B: Body,
    B::Error: Display,
{
    let mut body: SessionRequest = match read_json(req).await {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };

    body.id = id;
    respond(
        StatusCode::OK,
        state.sessions.update_session(ctx, body.into_session(Utc::now())),
    )
}

async fn report_sessions<B>(req: Request<B>, state: &AppState, ctx: &RequestContext) -> HttpResponse
where
    B: Body,
    B::Error: Display,
{
    let snapshot: SessionsSnapshot = match read_json(req).await {
        Ok(snapshot) => snapshot,
        Err(rejection) => return rejection,
    };

    let result = state
        .bus
        .publish(ctx, Event::SessionsSnapshotReported(snapshot))
        .await
        .map(|()| OkResponse::default());
    respond(StatusCode::OK, result)
}

async fn send_command<B>(req: Request<B>, state: &AppState, ctx: &RequestContext) -> HttpResponse
where
    B: Body,
    B::Error: Display,
{
    let command: PluginCommand = match read_json(req).await {
        Ok(command) => command,
        Err(rejection) => return rejection,
    };

    let result = state
        .dispatcher
        .send(ctx, command)
        .await
        .map(|()| OkResponse::default());
    respond(StatusCode::OK, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, WorkspaceSeed};
    use crate::plugin::transport::testing::{FailingTransport, RecordingTransport};
    use crate::plugin::PipeTransport;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use serde_json::{json, Value};
    use utena_protocol::Session;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.workspaces.seed.push(WorkspaceSeed {
            id: "ws-1".into(),
            name: "api".into(),
            path: "/home/me/dev/api".into(),
            is_git_repo: true,
        });
        config
    }

    fn state_with(transport: Arc<dyn PipeTransport>) -> Arc<AppState> {
        AppState::new(config(), transport).unwrap()
    }

    fn state() -> (Arc<RecordingTransport>, Arc<AppState>) {
        let transport = Arc::new(RecordingTransport::default());
        let state = state_with(transport.clone());
        (transport, state)
    }

    async fn call(
        state: &Arc<AppState>,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let bytes = body.map(|b| b.to_string()).unwrap_or_default();
        call_raw(state, method, path, bytes).await
    }

    async fn call_raw(
        state: &Arc<AppState>,
        method: Method,
        path: &str,
        body: String,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body)))
            .unwrap();

        let response = handle_request(req, Arc::clone(state)).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    // ==================== Routing Tests ====================

    #[tokio::test]
    async fn test_health() {
        let (_, state) = state();
        let (status, _) = call(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (_, state) = state();
        let (status, body) = call(&state, Method::GET, "/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "Not Found");
    }

    #[tokio::test]
    async fn test_workspaces() {
        let (_, state) = state();

        let (status, body) = call(&state, Method::GET, "/workspaces", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workspaces"].as_array().unwrap().len(), 2);

        let (status, body) = call(&state, Method::GET, "/workspaces/ws-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], "/home/me/dev/api");

        let (status, _) = call(&state, Method::GET, "/workspaces/ws-9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ==================== Session Tests ====================

    #[tokio::test]
    async fn test_create_session_notifies_plugin() {
        let (transport, state) = state();

        let (status, body) = call(
            &state,
            Method::POST,
            "/sessions",
            Some(json!({"id": "api", "workspace_id": "ws-1"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "api");
        assert_eq!(body["is_dead"], false);
        assert_eq!(transport.payloads().len(), 1);
    }

    #[tokio::test]
    async fn test_create_session_errors() {
        let (_, state) = state();
        let session = json!({"id": "api", "workspace_id": "ws-1"});

        call(&state, Method::POST, "/sessions", Some(session.clone())).await;
        let (status, body) = call(&state, Method::POST, "/sessions", Some(session)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "Bad Request");

        let (status, _) = call(
            &state,
            Method::POST,
            "/sessions",
            Some(json!({"id": "x", "workspace_id": "ws-9"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &state,
            Method::POST,
            "/sessions",
            Some(json!({"id": "", "workspace_id": "ws-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            call_raw(&state, Method::POST, "/sessions", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_workspace_id_is_400() {
        let (transport, state) = state();

        let (status, body) = call(
            &state,
            Method::POST,
            "/sessions",
            Some(json!({"id": "x", "workspace_id": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("empty workspace id"));
        assert!(state.sessions.get_session("x").is_err());
        assert!(transport.payloads().is_empty());

        state
            .sessions
            .create_session(&state.request_context(), Session::new("main", "ws-1"))
            .unwrap();
        let (status, _) = call(
            &state,
            Method::PUT,
            "/sessions/main",
            Some(json!({"is_attached": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stored = state.sessions.get_session("main").unwrap();
        assert_eq!(stored.workspace_id, "ws-1");
        assert!(!stored.is_attached);
    }

    #[tokio::test]
    async fn test_create_session_dispatch_failure_is_500() {
        let state = state_with(Arc::new(FailingTransport));

        let (status, body) = call(
            &state,
            Method::POST,
            "/sessions",
            Some(json!({"id": "api", "workspace_id": "ws-1"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("dispatch"));
        assert!(state.sessions.get_session("api").is_ok());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (_, state) = state();
        let ctx = state.request_context();
        state
            .sessions
            .create_session(&ctx, Session::new("main", "ws-1"))
            .unwrap();

        let (status, body) = call(&state, Method::GET, "/sessions/main", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workspace_id"], "ws-1");

        // Path id wins over the body id
        let (status, body) = call(
            &state,
            Method::PUT,
            "/sessions/main",
            Some(json!({"id": "other", "workspace_id": "default", "is_attached": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "main");
        assert_eq!(body["is_attached"], true);

        let (status, _) = call(&state, Method::POST, "/sessions/main/touch", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(&state, Method::GET, "/sessions/workspace/default", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sessions"].as_array().unwrap().len(), 1);

        let (status, _) = call(&state, Method::DELETE, "/sessions/main", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&state, Method::GET, "/sessions/main", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&state, Method::DELETE, "/sessions/main", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&state, Method::POST, "/sessions/main/touch", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_with_unknown_workspace_is_404() {
        let (_, state) = state();
        state
            .sessions
            .create_session(&state.request_context(), Session::new("main", "ws-1"))
            .unwrap();

        let (status, _) = call(
            &state,
            Method::PUT,
            "/sessions/main",
            Some(json!({"workspace_id": "ws-9"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sessions_listed_mru_first() {
        let (_, state) = state();
        let ctx = state.request_context();
        let now = Utc::now();
        for (id, age) in [("old", 60), ("new", 1), ("mid", 30)] {
            state
                .sessions
                .create_session(
                    &ctx,
                    Session::new(id, "ws-1").with_last_used_at(now - chrono::Duration::minutes(age)),
                )
                .unwrap();
        }

        let (_, body) = call(&state, Method::GET, "/sessions", None).await;
        let ids: Vec<&str> = body["sessions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_unknown_workspace_listing_is_404() {
        let (_, state) = state();
        let (status, _) = call(&state, Method::GET, "/sessions/workspace/ws-9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ==================== Plugin Tests ====================

    #[tokio::test]
    async fn test_snapshot_report_reconciles() {
        let (_, state) = state();

        let (status, body) = call(
            &state,
            Method::PUT,
            "/zellij/sessions",
            Some(json!({"sessions": [
                {"name": "main", "is_current_session": true},
                {"name": "bg", "is_current_session": false}
            ]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": "ok"}));
        assert!(state.sessions.get_session("main").unwrap().is_attached);
        assert_eq!(state.sessions.get_session("bg").unwrap().workspace_id, "default");
    }

    #[tokio::test]
    async fn test_snapshot_with_empty_name_is_400() {
        let (_, state) = state();

        let (status, _) = call(
            &state,
            Method::PUT,
            "/zellij/sessions",
            Some(json!({"sessions": [{"name": ""}]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.sessions.list_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_send_command() {
        let (transport, state) = state();

        let (status, _) = call(
            &state,
            Method::POST,
            "/zellij/commands",
            Some(json!({"command": "switch_session", "session_name": "main"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            transport.payloads(),
            vec![r#"{"command":"switch_session","session_name":"main"}"#]
        );

        let (status, _) = call(
            &state,
            Method::POST,
            "/zellij/commands",
            Some(json!({"command": "create_session", "session_name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &state,
            Method::POST,
            "/zellij/commands",
            Some(json!({"command": "reboot"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requests_fail_after_shutdown() {
        let (_, state) = state();
        state.shutdown();

        let (status, _) = call(
            &state,
            Method::POST,
            "/sessions",
            Some(json!({"id": "api", "workspace_id": "ws-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
