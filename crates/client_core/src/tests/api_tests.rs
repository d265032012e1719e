use std::sync::Arc;

use super::*;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response as AxumResponse},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{SchoolId, UserId},
    protocol::NewVolunteer,
};
use tokio::{net::TcpListener, sync::Mutex};

const NULL_EVENTS_USER: i64 = 0;
const PLAIN_TEXT_USER: i64 = 13;
const REJECTED_EVENT: i64 = 404;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    path: String,
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ServerState {
    async fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: &str) {
        self.requests.lock().await.push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: serde_json::from_str(body).ok(),
        });
    }

    async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

fn stored_event(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "type": "ride",
        "start_location": "School",
        "end_location": "Park",
        "date": "2024-05-10",
        "start_time": "09:00",
        "end_time": "10:00"
    })
}

async fn profile(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    state.record(method, &uri, &headers, "").await;
    Json(json!({
        "id": user_id,
        "first_name": "Fran",
        "last_name": "Lee",
        "email": "fran@example.org",
        "school_id": 4,
        "role": "volunteer"
    }))
}

async fn list_events(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    state.record(method, &uri, &headers, "").await;
    if user_id == NULL_EVENTS_USER {
        return Json(Value::Null);
    }
    Json(json!([stored_event(1, "First"), stored_event(2, "Second")]))
}

async fn create_event(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> AxumResponse {
    state.record(method, &uri, &headers, &body).await;
    if user_id == PLAIN_TEXT_USER {
        return (StatusCode::CREATED, "created").into_response();
    }
    let draft: Value = serde_json::from_str(&body).unwrap_or_default();
    let title = draft["title"].as_str().unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(json!({ "event": stored_event(100, title) })),
    )
        .into_response()
}

async fn update_event(
    State(state): State<ServerState>,
    Path((_user_id, event_id)): Path<(i64, i64)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> AxumResponse {
    state.record(method, &uri, &headers, &body).await;
    if event_id == REJECTED_EVENT {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    let echoed: Value = serde_json::from_str(&body).unwrap_or_default();
    Json(echoed).into_response()
}

async fn delete_event(
    State(state): State<ServerState>,
    Path((_user_id, event_id)): Path<(i64, i64)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> StatusCode {
    state.record(method, &uri, &headers, "").await;
    if event_id == REJECTED_EVENT {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn create_account(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    state.record(method, &uri, &headers, &body).await;
    let parsed: Value = serde_json::from_str(&body).unwrap_or_default();
    if parsed["first_name"] == "reject" {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    }
}

async fn spawn_api_server() -> (String, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/volunteers/facilitator/:user_id", get(profile))
        .route(
            "/volunteers/facilitator/:user_id/events",
            get(list_events).post(create_event),
        )
        .route(
            "/volunteers/facilitator/:user_id/events/:event_id",
            put(update_event).delete(delete_event),
        )
        .route("/volunteers/facilitator/:user_id/parents", post(create_account))
        .route(
            "/volunteers/facilitator/:user_id/volunteers",
            post(create_account),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn client_for(api_url: String) -> HttpFacilitatorApi {
    HttpFacilitatorApi::new(&ClientSettings {
        api_url,
        request_timeout_secs: 5,
    })
    .expect("client")
}

fn creds(user_id: i64) -> Credentials {
    Credentials {
        token: "tok-123".into(),
        user_id: UserId(user_id),
    }
}

fn sample_event(id: i64, title: &str) -> Event {
    serde_json::from_value(stored_event(id, title)).expect("event")
}

#[tokio::test]
async fn profile_and_events_use_bearer_token_and_facilitator_paths() {
    let (url, state) = spawn_api_server().await;
    let api = client_for(url);

    let facilitator = api.fetch_profile(&creds(7)).await.expect("profile");
    assert_eq!(facilitator.id, UserId(7));
    assert_eq!(facilitator.school_id, Some(SchoolId(4)));

    let events = api.list_events(&creds(7)).await.expect("events");
    assert_eq!(
        events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
        vec!["First", "Second"]
    );

    let requests = state.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path, "/volunteers/facilitator/7");
    assert_eq!(requests[1].path, "/volunteers/facilitator/7/events");
    assert!(requests
        .iter()
        .all(|r| r.authorization.as_deref() == Some("Bearer tok-123")));
}

#[tokio::test]
async fn null_event_list_is_empty() {
    let (url, _state) = spawn_api_server().await;
    let events = client_for(url)
        .list_events(&creds(NULL_EVENTS_USER))
        .await
        .expect("events");
    assert!(events.is_empty());
}

#[tokio::test]
async fn create_event_posts_camel_case_draft_and_unwraps_event() {
    let (url, state) = spawn_api_server().await;
    let draft = NewEvent {
        title: "Bike rodeo".into(),
        kind: "repair".into(),
        start_location: "Gym".into(),
        end_location: "Lot".into(),
        date: "2024-05-10".into(),
        start_time: "09:00".into(),
        end_time: "11:00".into(),
    };

    let created = client_for(url)
        .create_event(&creds(7), &draft)
        .await
        .expect("created");
    assert_eq!(created.id, EventId(100));
    assert_eq!(created.title, "Bike rodeo");

    let requests = state.requests().await;
    assert_eq!(requests[0].method, Method::POST);
    let body = requests[0].body.clone().expect("json body");
    assert_eq!(body["startLocation"], "Gym");
    assert_eq!(body["type"], "repair");
}

#[tokio::test]
async fn create_event_with_non_json_success_body_is_a_decode_failure() {
    let (url, _state) = spawn_api_server().await;
    let err = client_for(url)
        .create_event(&creds(PLAIN_TEXT_USER), &NewEvent::default())
        .await
        .expect_err("must fail");
    assert!(matches!(err, ApiFailure::Decode(_)), "unexpected: {err:?}");
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn update_event_puts_full_draft_and_parses_response() {
    let (url, state) = spawn_api_server().await;
    let mut event = sample_event(2, "Second");
    event.title = "Second (moved)".into();

    let updated = client_for(url)
        .update_event(&creds(7), &event)
        .await
        .expect("updated");
    assert_eq!(updated, event);

    let requests = state.requests().await;
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].path, "/volunteers/facilitator/7/events/2");
    let body = requests[0].body.clone().expect("json body");
    assert_eq!(body["start_location"], "School");
    assert_eq!(body["title"], "Second (moved)");
}

#[tokio::test]
async fn update_event_keeps_raw_text_of_error_bodies() {
    let (url, _state) = spawn_api_server().await;
    let err = client_for(url)
        .update_event(&creds(7), &sample_event(REJECTED_EVENT, "Gone"))
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        ApiFailure::Status {
            status: 500,
            body: "upstream exploded".into()
        }
    );
}

#[tokio::test]
async fn delete_event_reports_status_rejections() {
    let (url, state) = spawn_api_server().await;
    let api = client_for(url);

    api.delete_event(&creds(7), EventId(1)).await.expect("deleted");
    let err = api
        .delete_event(&creds(7), EventId(REJECTED_EVENT))
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(404));

    let requests = state.requests().await;
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(requests[0].path, "/volunteers/facilitator/7/events/1");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn provisioning_posts_to_account_endpoints() {
    let (url, state) = spawn_api_server().await;
    let api = client_for(url);

    let parent = NewParent {
        first_name: "Pat".into(),
        ..NewParent::default()
    };
    api.create_parent(&creds(7), &parent).await.expect("parent");

    let volunteer = VolunteerProvisioning::new(
        NewVolunteer {
            first_name: "Val".into(),
            ..NewVolunteer::default()
        },
        Some(SchoolId(4)),
    );
    api.create_volunteer(&creds(7), &volunteer)
        .await
        .expect("volunteer");

    let rejected = VolunteerProvisioning::new(
        NewVolunteer {
            first_name: "reject".into(),
            ..NewVolunteer::default()
        },
        None,
    );
    let err = api
        .create_volunteer(&creds(7), &rejected)
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(400));

    let requests = state.requests().await;
    assert_eq!(requests[0].path, "/volunteers/facilitator/7/parents");
    assert_eq!(requests[0].body.as_ref().expect("body")["waiver"], true);
    assert_eq!(requests[1].path, "/volunteers/facilitator/7/volunteers");
    let body = requests[1].body.clone().expect("body");
    assert_eq!(body["password"], "password");
    assert_eq!(body["school_id"], 4);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client_for(format!("http://{addr}"))
        .fetch_profile(&creds(7))
        .await
        .expect_err("must fail");
    assert!(matches!(err, ApiFailure::Transport(_)), "unexpected: {err:?}");
}
