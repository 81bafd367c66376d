use axum::http::StatusCode;

pub const PATH_NOT_DEFINED: &str = "Path not defined";

/// Any request that matches no route, whatever its method.
pub async fn path_not_defined() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, PATH_NOT_DEFINED)
}
