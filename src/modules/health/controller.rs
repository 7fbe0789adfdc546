use axum::Json;

pub async fn healthcheck() -> Json<&'static str> {
    Json("yay!")
}
