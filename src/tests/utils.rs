use crate::db::connection::{init_db, Database};
use astra::Body;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh test database using the production schema, backed by a
/// uniquely named temp file so tests don't trample each other.
pub fn init_test_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "leadflow_{}_{}.sqlite",
        tag,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize test DB");
    db
}

/// Build a request the router can handle.
pub fn request(method: &str, uri: &str, body: Option<&str>) -> astra::Request {
    let body = match body {
        Some(b) => Body::from(b.to_string()),
        None => Body::empty(),
    };
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .expect("Failed to build test request")
}

/// Drain a response body to a string.
pub fn body_string(resp: &mut astra::Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .expect("Failed to read response body");
    String::from_utf8(bytes).expect("Response body was not UTF-8")
}
