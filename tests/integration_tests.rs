use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{Method, Request, StatusCode};
use axum::routing::{get, post, put, MethodRouter};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use salon_console::config::AppConfig;
use salon_console::handlers;
use salon_console::state::AppState;

// ── Mock Upstream ──

type Reply = Mutex<(u16, String)>;

struct Upstream {
    bookings: Reply,
    services: Reply,
    designs: Reply,
    categories: Reply,
    waitlist: Reply,
    writes: Reply,
    forms: Mutex<Vec<(String, Vec<(String, String)>)>>,
    files: Mutex<Vec<(String, String)>>,
    deletes: Mutex<Vec<String>>,
    time_updates: Mutex<Vec<(String, Value)>>,
}

fn ok(body: Value) -> Reply {
    Mutex::new((200, body.to_string()))
}

impl Upstream {
    fn new() -> Self {
        Self {
            bookings: ok(json!({ "value": [] })),
            services: ok(json!({ "value": [] })),
            designs: ok(json!({ "value": [] })),
            categories: ok(json!([])),
            waitlist: ok(json!([])),
            writes: ok(json!({})),
            forms: Mutex::new(vec![]),
            files: Mutex::new(vec![]),
            deletes: Mutex::new(vec![]),
            time_updates: Mutex::new(vec![]),
        }
    }

    fn set(slot: &Reply, status: u16, body: Value) {
        *slot.lock().unwrap() = (status, body.to_string());
    }
}

fn reply(slot: &Reply) -> (StatusCode, String) {
    let (status, body) = slot.lock().unwrap().clone();
    (StatusCode::from_u16(status).unwrap(), body)
}

async fn record_form(up: &Upstream, label: String, mut multipart: Multipart) -> (StatusCode, String) {
    let mut fields = vec![];
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name() {
            up.files.lock().unwrap().push((name.clone(), file_name.to_string()));
        }
        let text = field.text().await.unwrap_or_default();
        fields.push((name, text));
    }
    up.forms.lock().unwrap().push((label, fields));
    reply(&up.writes)
}

/// Multipart create/update and `?id=` delete, as the catalog write endpoints take them.
fn write_routes(path: &'static str) -> MethodRouter<Arc<Upstream>> {
    post(move |State(up): State<Arc<Upstream>>, m: Multipart| async move {
        record_form(&up, format!("POST {path}"), m).await
    })
    .put(
        move |State(up): State<Arc<Upstream>>, Query(q): Query<HashMap<String, String>>, m: Multipart| async move {
            let id = q.get("id").cloned().unwrap_or_default();
            record_form(&up, format!("PUT {path}?id={id}"), m).await
        },
    )
    .delete(
        |State(up): State<Arc<Upstream>>, Query(q): Query<HashMap<String, String>>| async move {
            up.deletes.lock().unwrap().push(q.get("id").cloned().unwrap_or_default());
            reply(&up.writes)
        },
    )
}

async fn spawn_upstream(up: Arc<Upstream>) -> String {
    let app = Router::new()
        .route("/odata/booking", get(|State(up): State<Arc<Upstream>>| async move { reply(&up.bookings) }))
        .route("/odata/Service", get(|State(up): State<Arc<Upstream>>| async move { reply(&up.services) }))
        .route("/odata/design", get(|State(up): State<Arc<Upstream>>| async move { reply(&up.designs) }))
        .route(
            "/api/Adjective/Categories",
            get(|State(up): State<Arc<Upstream>>| async move { reply(&up.categories) }),
        )
        .route("/api/Service", write_routes("/api/Service"))
        .route("/api/Design", write_routes("/api/Design"))
        .route("/Booking", get(|State(up): State<Arc<Upstream>>| async move { reply(&up.waitlist) }))
        .route(
            "/Booking/:id",
            put(
                |State(up): State<Arc<Upstream>>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    up.time_updates.lock().unwrap().push((id, body));
                    reply(&up.writes)
                },
            ),
        )
        .with_state(up);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ── Helpers ──

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        port: 3000,
        api_base_url: base_url.to_string(),
        waitlist_base_url: base_url.to_string(),
        placeholder_image_url: "https://img.example/noimage.jpg".to_string(),
        console_token: "test-token".to_string(),
        resync_delay: Duration::ZERO,
        booking_status_filter: 1,
    }
}

async fn test_app() -> (Router, Arc<Upstream>) {
    let up = Arc::new(Upstream::new());
    let base_url = spawn_upstream(Arc::clone(&up)).await;
    let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let state = Arc::new(AppState::with_today(test_config(&base_url), today));
    (handlers::router(state), up)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", "Bearer test-token");
    let body = match body {
        Some(json) => {
            req = req.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn ids(rows: &Value) -> Vec<String> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

// ── Auth ──

#[tokio::test]
async fn test_health_is_open() {
    let (app, _) = test_app().await;
    let res = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_console_requires_auth() {
    let (app, _) = test_app().await;

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/api/bookings").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/catalog")
                .header("Authorization", "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notice_stream_accepts_query_token() {
    let (app, _) = test_app().await;

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/notices/stream?token=wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/notices/stream?token=test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
}

// ── Bookings ──

#[tokio::test]
async fn test_bookings_refresh_renders_rows() {
    let (app, up) = test_app().await;
    Upstream::set(
        &up.bookings,
        200,
        json!({ "value": [{ "ID": 1, "Status": 1, "TotalAmount": 150000 }] }),
    );

    let (status, view) = call(&app, Method::POST, "/api/bookings/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["count"], 1);
    assert_eq!(view["loading"], false);
    assert!(view["error"].is_null());
    let row = &view["rows"][0];
    assert_eq!(row["status_label"], "Confirmed");
    assert_eq!(row["amount"], "150,000 VND");
    assert_eq!(row["date"], "Invalid Date");
    assert_eq!(row["store_address"], "N/A");
}

#[tokio::test]
async fn test_malformed_bookings_empty_the_list() {
    let (app, up) = test_app().await;
    Upstream::set(&up.bookings, 200, json!({ "value": [{ "ID": 1, "Status": 1 }] }));
    let (_, view) = call(&app, Method::POST, "/api/bookings/refresh", None).await;
    assert_eq!(view["count"], 1);

    Upstream::set(&up.bookings, 200, json!({ "items": [] }));
    let (status, view) = call(&app, Method::POST, "/api/bookings/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["count"], 0);
    assert!(view["error"].as_str().unwrap().contains("value"));

    Upstream::set(&up.bookings, 500, json!({ "message": "boom" }));
    let (_, view) = call(&app, Method::POST, "/api/bookings/refresh", None).await;
    assert_eq!(view["count"], 0);
    assert!(view["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_bookings_sort_toggles() {
    let (app, up) = test_app().await;
    Upstream::set(
        &up.bookings,
        200,
        json!({ "value": [
            { "ID": 1, "Status": 1, "TotalAmount": 300 },
            { "ID": 2, "Status": 1, "TotalAmount": 100 },
        ] }),
    );
    call(&app, Method::POST, "/api/bookings/refresh", None).await;

    let key = json!({ "key": "totalAmount" });
    let (_, view) = call(&app, Method::POST, "/api/bookings/sort", Some(key.clone())).await;
    assert_eq!(ids(&view["rows"]), vec!["2", "1"]);
    let (_, view) = call(&app, Method::POST, "/api/bookings/sort", Some(key)).await;
    assert_eq!(ids(&view["rows"]), vec!["1", "2"]);
    assert_eq!(view["sort"]["direction"], "descending");
}

#[tokio::test]
async fn test_calendar_navigation() {
    let (app, _) = test_app().await;
    let (_, grid) = call(&app, Method::GET, "/api/bookings/calendar", None).await;
    assert_eq!(grid["cells"].as_array().unwrap().len(), 42);
    let (year, month) = (grid["year"].as_i64().unwrap(), grid["month"].as_i64().unwrap());

    let (_, next) = call(&app, Method::POST, "/api/bookings/calendar/next", None).await;
    let expected = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    assert_eq!(
        (next["year"].as_i64().unwrap(), next["month"].as_i64().unwrap()),
        expected
    );
}

// ── Catalog ──

fn three_services() -> Value {
    json!({ "value": [
        { "ID": 1, "Name": "Gel", "Price": 100000, "AverageDuration": 30 },
        { "ID": 2, "Name": "Acrylic", "Price": 200000, "AverageDuration": 60 },
        { "ID": 3, "Name": "Chrome", "Price": 150000, "AverageDuration": 45 },
    ] })
}

#[tokio::test]
async fn test_delete_removes_only_matching_record() {
    let (app, up) = test_app().await;
    Upstream::set(&up.services, 200, three_services());
    call(&app, Method::POST, "/api/catalog/refresh", None).await;

    let (status, view) = call(&app, Method::DELETE, "/api/catalog/items/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&view["services"]), vec!["1", "3"]);
    assert_eq!(*up.deletes.lock().unwrap(), vec!["2".to_string()]);

    let (_, notices) = call(&app, Method::GET, "/api/notices", None).await;
    assert!(notices.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delete_keeps_record() {
    let (app, up) = test_app().await;
    Upstream::set(&up.services, 200, three_services());
    call(&app, Method::POST, "/api/catalog/refresh", None).await;
    Upstream::set(&up.writes, 500, json!({ "message": "in use" }));

    let (_, view) = call(&app, Method::DELETE, "/api/catalog/items/2", None).await;
    assert_eq!(ids(&view["services"]), vec!["1", "2", "3"]);
    assert!(view["services_status"]["error"].is_string());

    let (_, notices) = call(&app, Method::GET, "/api/notices", None).await;
    assert!(notices.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_service_with_single_category() {
    let (app, up) = test_app().await;

    call(&app, Method::POST, "/api/catalog/compose", None).await;
    let draft = json!({
        "name": "Gel",
        "price": 100000.0,
        "category": "c7",
        "category_ids": [],
        "duration": 30,
    });
    let (status, view) = call(&app, Method::PUT, "/api/catalog/draft", Some(draft)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["service_form"]["editor"]["state"], "composing");

    Upstream::set(&up.services, 200, three_services());
    let (status, view) = call(&app, Method::POST, "/api/catalog/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["service_form"]["editor"]["state"], "idle");
    assert_eq!(view["service_form"]["draft"]["name"], "");
    assert_eq!(view["services"].as_array().unwrap().len(), 3);

    let forms = up.forms.lock().unwrap();
    assert_eq!(forms.len(), 1);
    let (label, fields) = &forms[0];
    assert_eq!(label, "POST /api/Service");
    let categories: Vec<&(String, String)> = fields
        .iter()
        .filter(|(k, _)| k.starts_with("CategoryIds"))
        .collect();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].0, "CategoryIds[0]");
    assert_eq!(categories[0].1, "c7");
    assert!(fields
        .iter()
        .any(|(k, v)| k == "ImageUrl" && v == "https://img.example/noimage.jpg"));
    drop(forms);

    let (_, notices) = call(&app, Method::GET, "/api/notices", None).await;
    assert_eq!(notices[0]["level"], "info");
    assert_eq!(notices[0]["message"], "Service added successfully!");
}

#[tokio::test]
async fn test_update_failure_alerts_with_server_message() {
    let (app, up) = test_app().await;
    Upstream::set(&up.services, 200, three_services());
    call(&app, Method::POST, "/api/catalog/refresh", None).await;

    let (_, view) = call(&app, Method::POST, "/api/catalog/edit/3", None).await;
    assert_eq!(view["service_form"]["draft"]["name"], "Chrome");
    assert_eq!(view["submit_label"], "Update");

    Upstream::set(&up.writes, 400, json!({ "message": "Name already exists" }));
    let (status, view) = call(&app, Method::POST, "/api/catalog/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["service_form"]["editor"]["state"], "idle");
    assert_eq!(view["submit_label"], "Add New");

    let forms = up.forms.lock().unwrap();
    assert_eq!(forms[0].0, "PUT /api/Service?id=3");
    drop(forms);

    let (_, notices) = call(&app, Method::GET, "/api/notices", None).await;
    assert_eq!(notices[0]["level"], "error");
    assert_eq!(
        notices[0]["message"],
        "Error updating service: Name already exists"
    );
}

fn form_keys(fields: &[(String, String)]) -> Vec<&str> {
    fields.iter().map(|(k, _)| k.as_str()).collect()
}

#[tokio::test]
async fn test_design_create_update_and_delete() {
    let (app, up) = test_app().await;

    let (_, view) = call(&app, Method::POST, "/api/catalog/tab", Some(json!({ "tab": "designs" }))).await;
    assert_eq!(view["tab"], "designs");
    call(&app, Method::POST, "/api/catalog/compose", None).await;
    let draft = json!({
        "name": "Chrome Tips",
        "trend_score": 4.5,
        "color_ids": ["c1", "c2"],
        "media_files": [
            { "file_name": "tips.png", "content_type": "image/png", "data": "aGVsbG8=" }
        ],
    });
    let (status, view) = call(&app, Method::PUT, "/api/catalog/draft", Some(draft)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["design_form"]["editor"]["state"], "composing");

    Upstream::set(
        &up.designs,
        200,
        json!({ "value": [{ "ID": "d1", "Name": "Chrome Tips", "TrendScore": 4 }] }),
    );
    let (status, view) = call(&app, Method::POST, "/api/catalog/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["design_form"]["editor"]["state"], "idle");
    assert_eq!(ids(&view["designs"]), vec!["d1"]);

    {
        let forms = up.forms.lock().unwrap();
        let (label, fields) = &forms[0];
        assert_eq!(label, "POST /api/Design");
        let keys = form_keys(fields);
        assert!(keys.contains(&"ColorIds[0]"));
        assert!(keys.contains(&"ColorIds[1]"));
        assert!(keys.contains(&"MediaFiles[0]"));
        assert!(!keys.iter().any(|k| k.starts_with("Services")));
        assert!(fields.iter().any(|(k, v)| k == "ColorIds[1]" && v == "c2"));
    }
    assert_eq!(
        *up.files.lock().unwrap(),
        vec![("MediaFiles[0]".to_string(), "tips.png".to_string())]
    );

    let (status, view) = call(&app, Method::POST, "/api/catalog/edit/d1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["design_form"]["draft"]["name"], "Chrome Tips");
    assert_eq!(view["submit_label"], "Update");
    let (status, _) = call(&app, Method::POST, "/api/catalog/submit", None).await;
    assert_eq!(status, StatusCode::OK);

    {
        let forms = up.forms.lock().unwrap();
        assert_eq!(forms.len(), 2);
        let (label, fields) = &forms[1];
        assert_eq!(label, "PUT /api/Design?id=d1");
        assert!(fields.iter().any(|(k, v)| k == "ID" && v == "d1"));
        assert!(fields.iter().any(|(k, v)| k == "TrendScore" && v == "4"));
        assert!(!form_keys(fields).contains(&"Services[0].ServiceID"));
    }

    let (_, view) = call(&app, Method::DELETE, "/api/catalog/items/d1", None).await;
    assert_eq!(*up.deletes.lock().unwrap(), vec!["d1".to_string()]);
    assert!(view["designs"].as_array().unwrap().is_empty());

    let (_, notices) = call(&app, Method::GET, "/api/notices", None).await;
    assert_eq!(notices.as_array().unwrap().len(), 2);
    assert!(notices.as_array().unwrap().iter().all(|n| n["level"] == "info"));
}

#[tokio::test]
async fn test_submit_without_form_is_rejected() {
    let (app, up) = test_app().await;
    let (status, _) = call(&app, Method::POST, "/api/catalog/submit", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(up.forms.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_unknown_record_is_not_found() {
    let (app, _) = test_app().await;
    let (status, body) = call(&app, Method::POST, "/api/catalog/edit/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99"));
}

// ── Waitlist ──

fn waitlist_entries() -> Value {
    json!([
        { "id": "1", "name": "Lan", "date": "2025-01-02T08:00:00.000Z", "startTime": "09:00",
          "endTime": "10:00", "service": "Gel", "store": "District 1", "price": "250000" },
        { "id": "2", "name": "Mai", "date": "2025-01-02T10:00:00.000Z", "startTime": "11:00",
          "endTime": "12:00", "service": "Acrylic", "store": "District 3", "price": 180000 },
        { "id": "3", "name": "Hoa", "date": "2025-01-05T10:00:00.000Z", "startTime": "11:00",
          "endTime": "12:00", "service": "Chrome", "store": "District 1", "price": 90000 },
    ])
}

#[tokio::test]
async fn test_waitlist_filters_by_day_and_store() {
    let (app, up) = test_app().await;
    Upstream::set(&up.waitlist, 200, waitlist_entries());

    let (_, view) = call(&app, Method::POST, "/api/waitlist/refresh", None).await;
    assert_eq!(view["count"], 2);
    assert_eq!(view["stores"], json!(["all", "District 1", "District 3"]));

    let select = json!({ "date": "2025-01-02", "store": "District 1" });
    let (_, view) = call(&app, Method::POST, "/api/waitlist/select", Some(select)).await;
    assert_eq!(ids(&view["cards"]), vec!["1"]);
    assert_eq!(view["cards"][0]["price"], "250000đ");
    assert_eq!(view["cards"][0]["time"], "09:00 - 10:00");

    let select = json!({ "date": "2025-01-05", "store": "all" });
    let (_, view) = call(&app, Method::POST, "/api/waitlist/select", Some(select)).await;
    assert_eq!(ids(&view["cards"]), vec!["3"]);
}

#[tokio::test]
async fn test_waitlist_time_save_writes_then_refetches() {
    let (app, up) = test_app().await;
    Upstream::set(&up.waitlist, 200, waitlist_entries());
    call(&app, Method::POST, "/api/waitlist/refresh", None).await;

    let (status, edit) = call(&app, Method::POST, "/api/waitlist/1/edit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edit["start_time"], "09:00");

    let mut moved = waitlist_entries();
    moved[0]["startTime"] = json!("13:00");
    moved[0]["endTime"] = json!("14:00");
    Upstream::set(&up.waitlist, 200, moved);

    let times = json!({ "start_time": "13:00", "end_time": "14:00" });
    let (status, view) = call(&app, Method::PUT, "/api/waitlist/1/time", Some(times)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(view["time_edit"].is_null());
    assert_eq!(view["cards"][0]["time"], "13:00 - 14:00");

    let updates = up.time_updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "1");
    assert_eq!(updates[0].1, json!({ "startTime": "13:00", "endTime": "14:00" }));
}

#[tokio::test]
async fn test_waitlist_time_save_failure_alerts() {
    let (app, up) = test_app().await;
    Upstream::set(&up.waitlist, 200, waitlist_entries());
    call(&app, Method::POST, "/api/waitlist/refresh", None).await;
    Upstream::set(&up.writes, 404, json!("Not found"));

    let times = json!({ "start_time": "13:00", "end_time": "14:00" });
    let (_, view) = call(&app, Method::PUT, "/api/waitlist/1/time", Some(times)).await;
    assert!(view["error"].as_str().unwrap().contains("404"));

    let (_, notices) = call(&app, Method::GET, "/api/notices", None).await;
    assert_eq!(notices[0]["level"], "error");
    assert!(notices[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Error updating time: "));
}
