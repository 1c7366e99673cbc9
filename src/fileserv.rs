use crate::app::App;
use axum::body::{boxed, Body, BoxBody};
use axum::extract::State;
use axum::http::{Request, Response, StatusCode, Uri};
use axum::response::{IntoResponse, Response as AxumResponse};
use leptos::LeptosOptions;
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serves built assets from the site root; anything else is rendered by
/// the app, which shows its own not-found state.
pub async fn file_and_error_handler(
    uri: Uri,
    State(options): State<LeptosOptions>,
    req: Request<Body>,
) -> AxumResponse {
    match static_file(uri, &options.site_root).await {
        Ok(res) if res.status() == StatusCode::OK => res.into_response(),
        Ok(_) => {
            let handler = leptos_axum::render_app_to_stream(options.to_owned(), App);
            handler(req).await.into_response()
        }
        Err((status, msg)) => {
            tracing::error!("static file lookup failed: {msg}");
            (status, msg).into_response()
        }
    }
}

async fn static_file(uri: Uri, root: &str) -> Result<Response<BoxBody>, (StatusCode, String)> {
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    match ServeDir::new(root).oneshot(req).await {
        Ok(res) => Ok(res.map(boxed)),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {err}"),
        )),
    }
}
