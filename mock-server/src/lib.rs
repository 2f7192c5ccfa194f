use std::{cmp::Ordering, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored item or form: any JSON object, identified by `_id`.
pub type Record = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Store {
    pub items: Vec<Record>,
    pub forms: Vec<Record>,
}

pub type Db = Arc<RwLock<Store>>;

/// Query parameters accepted by the list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub sortby: Option<String>,
    pub sortorder: Option<String>,
}

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Build the router over an existing store, e.g. one pre-seeded by a test.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/api/items/get", get(list_items))
        .route("/api/items/add", post(add_item))
        .route("/api/forms/get", get(list_forms))
        .route("/api/form/add", post(add_form))
        .with_state(db)
}

/// A router that answers every request with `status` (500 if `status` is
/// not a valid code).
pub fn failing_app(status: u16) -> Router {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Router::new().fallback(move || async move { (status, "mock failure") })
}

/// Store pre-filled with the given records, kept as-is (including ids).
pub fn seeded(items: Vec<Record>, forms: Vec<Record>) -> Db {
    Arc::new(RwLock::new(Store { items, forms }))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("mock PocketShelf API on http://{addr}/api/");
    }
    axum::serve(listener, router).await
}

async fn list_items(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Record>> {
    let store = db.read().await;
    Json(select(&store.items, &params))
}

async fn list_forms(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Record>> {
    let store = db.read().await;
    Json(select(&store.forms, &params))
}

async fn add_item(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let id = insert(&mut db.write().await.items, body)?;
    log::debug!("stored item {id}");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn add_form(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let id = insert(&mut db.write().await.forms, body)?;
    log::debug!("stored form {id}");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Records matching `params.name`, ordered by `sortby` (default `itemName`),
/// descending only when `sortorder` is absent or exactly `desc`.
pub fn select(records: &[Record], params: &ListParams) -> Vec<Record> {
    let mut matching: Vec<Record> = records
        .iter()
        .filter(|record| match params.name.as_deref() {
            Some(name) if !name.is_empty() => display_name(record) == Some(name),
            _ => true,
        })
        .cloned()
        .collect();

    let key = params.sortby.as_deref().unwrap_or("itemName");
    let descending = params.sortorder.as_deref().unwrap_or("desc") == "desc";
    matching.sort_by(|a, b| {
        let order = compare_values(a.get(key), b.get(key));
        if descending {
            order.reverse()
        } else {
            order
        }
    });
    matching
}

/// Store `body` under a fresh id. Client-supplied ids are discarded.
pub fn insert(records: &mut Vec<Record>, body: Value) -> Result<String, StatusCode> {
    let Value::Object(mut record) = body else {
        return Err(StatusCode::BAD_REQUEST);
    };
    record.remove("id");
    record.remove("_id");
    let id = Uuid::new_v4().simple().to_string();
    record.insert("_id".to_string(), Value::String(id.clone()));
    records.push(record);
    Ok(id)
}

fn display_name(record: &Record) -> Option<&str> {
    record
        .get("name")
        .or_else(|| record.get("itemName"))
        .and_then(Value::as_str)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}
