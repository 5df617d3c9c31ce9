use super::*;
use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use shared::domain::Gender;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct Collection {
    rows: Arc<Mutex<BTreeMap<i64, Employee>>>,
}

fn form(name: &str) -> EmployeeFormData {
    EmployeeFormData::new(
        name,
        Gender::Female,
        NaiveDate::from_ymd_opt(1990, 5, 17).expect("date"),
        "Kerala",
    )
}

fn with_id(id: i64, data: EmployeeFormData) -> Employee {
    Employee {
        id: EmployeeId(id),
        full_name: data.full_name,
        gender: data.gender,
        date_of_birth: data.date_of_birth,
        profile_image: data.profile_image,
        state: data.state,
        is_active: data.is_active,
    }
}

async fn list_rows(State(state): State<Collection>) -> Json<Vec<Employee>> {
    Json(state.rows.lock().await.values().cloned().collect())
}

async fn create_row(
    State(state): State<Collection>,
    Json(data): Json<EmployeeFormData>,
) -> (StatusCode, Json<Employee>) {
    let mut rows = state.rows.lock().await;
    let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
    let employee = with_id(id, data);
    rows.insert(id, employee.clone());
    (StatusCode::CREATED, Json(employee))
}

async fn get_row(
    State(state): State<Collection>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, StatusCode> {
    state
        .rows
        .lock()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn replace_row(
    State(state): State<Collection>,
    Path(id): Path<i64>,
    Json(data): Json<EmployeeFormData>,
) -> Result<Json<Employee>, StatusCode> {
    let mut rows = state.rows.lock().await;
    let Some(row) = rows.get_mut(&id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    *row = with_id(id, data);
    Ok(Json(row.clone()))
}

async fn delete_row(State(state): State<Collection>, Path(id): Path<i64>) -> StatusCode {
    match state.rows.lock().await.remove(&id) {
        Some(_) => StatusCode::OK,
        None => StatusCode::NOT_FOUND,
    }
}

async fn serve(app: Router) -> Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}")).expect("url")
}

async fn spawn_collection() -> (HttpEmployeeApi, Collection) {
    let state = Collection::default();
    let app = Router::new()
        .route("/employees", get(list_rows).post(create_row))
        .route(
            "/employees/:id",
            get(get_row).put(replace_row).delete(delete_row),
        )
        .with_state(state.clone());
    let url = serve(app).await;
    let api = HttpEmployeeApi::new(&url, Duration::from_secs(5)).expect("client");
    (api, state)
}

#[tokio::test]
async fn create_then_list_returns_server_assigned_ids() {
    let (api, _state) = spawn_collection().await;

    let first = api.create(&form("Asha Menon")).await.expect("create");
    let second = api.create(&form("Ravi Kumar")).await.expect("create");
    assert_eq!(first.id, EmployeeId(1));
    assert_eq!(second.id, EmployeeId(2));

    let listed = api.list_all().await.expect("list");
    let names: Vec<_> = listed.iter().map(|e| e.full_name.as_str()).collect();
    assert_eq!(names, vec!["Asha Menon", "Ravi Kumar"]);
}

#[tokio::test]
async fn replace_overwrites_every_mutable_field() {
    let (api, state) = spawn_collection().await;
    let created = api.create(&form("Asha Menon")).await.expect("create");

    let mut update = form("Asha M.");
    update.state = "Goa".into();
    update.is_active = false;
    let replaced = api.replace(created.id, &update).await.expect("replace");

    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.state, "Goa");
    assert!(!replaced.is_active);
    let stored = state.rows.lock().await.get(&1).cloned().expect("row");
    assert_eq!(stored, replaced);
}

#[tokio::test]
async fn missing_ids_surface_as_not_found() {
    let (api, _state) = spawn_collection().await;

    let err = api.get_by_id(EmployeeId(42)).await.expect_err("missing");
    assert_eq!(err, ApiError::NotFound { id: EmployeeId(42) });

    let err = api
        .replace(EmployeeId(42), &form("Nobody"))
        .await
        .expect_err("missing");
    assert!(err.is_not_found());

    let err = api.delete(EmployeeId(42)).await.expect_err("missing");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_removes_record() {
    let (api, _state) = spawn_collection().await;
    let created = api.create(&form("Asha Menon")).await.expect("create");

    api.delete(created.id).await.expect("delete");

    assert!(api.list_all().await.expect("list").is_empty());
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let app = Router::new().route(
        "/employees",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db.json is locked") }),
    );
    let url = serve(app).await;
    let api = HttpEmployeeApi::new(&url, Duration::from_secs(5)).expect("client");

    let err = api.list_all().await.expect_err("must fail");
    assert_eq!(
        err,
        ApiError::Transport(TransportError::Status {
            status: 500,
            body: "db.json is locked".into(),
        })
    );
}

#[tokio::test]
async fn collection_404_is_a_transport_failure() {
    let app = Router::new();
    let url = serve(app).await;
    let api = HttpEmployeeApi::new(&url, Duration::from_secs(5)).expect("client");

    let err = api.list_all().await.expect_err("must fail");
    assert!(matches!(
        err,
        ApiError::Transport(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let app = Router::new().route("/employees", get(|| async { "[{\"id\":\"x\"}]" }));
    let url = serve(app).await;
    let api = HttpEmployeeApi::new(&url, Duration::from_secs(5)).expect("client");

    let err = api.list_all().await.expect_err("must fail");
    assert!(matches!(err, ApiError::Transport(TransportError::Decode(_))));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let app = Router::new().route(
        "/employees",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(Vec::<Employee>::new())
        }),
    );
    let url = serve(app).await;
    let timeout = Duration::from_millis(100);
    let api = HttpEmployeeApi::new(&url, timeout).expect("client");

    let err = api.list_all().await.expect_err("must time out");
    assert_eq!(err, ApiError::Transport(TransportError::Timeout(timeout)));
}

#[tokio::test]
async fn error_body_stalling_past_timeout_is_a_timeout() {
    let app = Router::new().route(
        "/employees",
        get(|| async {
            let head = futures::stream::iter([Ok::<_, std::io::Error>("partial ".to_string())]);
            let stalled = futures::stream::once(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("never".to_string())
            });
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::body::Body::from_stream(futures::StreamExt::chain(head, stalled)),
            )
        }),
    );
    let url = serve(app).await;
    let timeout = Duration::from_millis(200);
    let api = HttpEmployeeApi::new(&url, timeout).expect("client");

    let err = api.list_all().await.expect_err("must time out");
    assert_eq!(err, ApiError::Transport(TransportError::Timeout(timeout)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let url = Url::parse(&format!("http://{addr}")).expect("url");
    let api = HttpEmployeeApi::new(&url, Duration::from_secs(2)).expect("client");

    let err = api.list_all().await.expect_err("must fail");
    assert!(matches!(err, ApiError::Transport(TransportError::Network(_))));
}

#[test]
fn trailing_slash_in_base_url_is_ignored() {
    let url = Url::parse("http://localhost:3001/").expect("url");
    let api = HttpEmployeeApi::new(&url, Duration::from_secs(1)).expect("client");
    assert_eq!(api.record_url(EmployeeId(3)), "http://localhost:3001/employees/3");
}
