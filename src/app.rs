use axum::{
    Router,
    extract::State,
    handler::Handler,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::SiteConfig;
use crate::data::load_portfolio;
use crate::render::{RenderedSite, SiteRenderer};

/// Pages rendered once at startup plus where to find static assets
pub struct AppState {
    pub site: RenderedSite,
    pub static_dir: PathBuf,
}

/// Build the router serving the rendered site
///
/// Anything that is neither a page nor a file under the static directory gets
/// the rendered 404 page with a 404 status. `/404.html` and `/500.html` answer
/// with their own status, as a static host would when it falls back to them.
pub fn router(state: Arc<AppState>) -> Router {
    let not_found = serve_not_found.with_state(state.clone());
    let assets = ServeDir::new(&state.static_dir).not_found_service(not_found);

    Router::new()
        .route("/", get(serve_index))
        .route("/index.html", get(serve_index))
        .route("/blog", get(serve_blog))
        .route("/blog/", get(serve_blog))
        .route("/rss.xml", get(serve_rss))
        .route("/404.html", get(serve_not_found))
        .route("/500.html", get(serve_server_error))
        .fallback_service(assets)
        .with_state(state)
}

/// Load the data file, render it and serve until the process is stopped
pub async fn run(config: &SiteConfig) -> Result<(), Box<dyn std::error::Error>> {
    let portfolio = load_portfolio(&config.data_path)?;
    let renderer = match &config.templates_dir {
        Some(dir) => SiteRenderer::with_templates_dir(config.render_options(), dir)?,
        None => SiteRenderer::new(config.render_options())?,
    };
    let site = renderer.render_site(&portfolio)?;

    let state = Arc::new(AppState {
        site,
        static_dir: config.static_dir.clone(),
    });
    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.site.index.clone())
}

async fn serve_blog(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.site.blog.clone())
}

async fn serve_rss(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        state.site.rss.clone(),
    )
        .into_response()
}

async fn serve_not_found(State(state): State<Arc<AppState>>) -> Response {
    (StatusCode::NOT_FOUND, Html(state.site.not_found.clone())).into_response()
}

async fn serve_server_error(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(state.site.server_error.clone()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state(static_dir: PathBuf) -> Arc<AppState> {
        Arc::new(AppState {
            site: RenderedSite {
                index: "<main>index</main>".to_string(),
                blog: "<main>blog</main>".to_string(),
                not_found: "<main>missing</main>".to_string(),
                server_error: "<main>oops</main>".to_string(),
                rss: "<rss></rss>".to_string(),
            },
            static_dir,
        })
    }

    async fn get_path(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn serves_pages() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(dir.path().to_path_buf()));

        assert_eq!(get_path(app.clone(), "/").await, (StatusCode::OK, "<main>index</main>".to_string()));
        assert_eq!(get_path(app.clone(), "/blog").await.1, "<main>blog</main>");
        assert_eq!(get_path(app, "/blog/").await.1, "<main>blog</main>");
    }

    #[tokio::test]
    async fn exported_error_pages_keep_their_status() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(dir.path().to_path_buf()));

        assert_eq!(
            get_path(app.clone(), "/500.html").await,
            (StatusCode::INTERNAL_SERVER_ERROR, "<main>oops</main>".to_string())
        );
        assert_eq!(
            get_path(app, "/404.html").await,
            (StatusCode::NOT_FOUND, "<main>missing</main>".to_string())
        );
    }

    #[tokio::test]
    async fn rss_has_feed_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(state(dir.path().to_path_buf()))
            .oneshot(Request::builder().uri("/rss.xml").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/rss+xml; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn static_files_and_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.css"), "body{}").unwrap();
        let app = router(state(dir.path().to_path_buf()));

        assert_eq!(get_path(app.clone(), "/site.css").await, (StatusCode::OK, "body{}".to_string()));
        assert_eq!(
            get_path(app, "/no/such/page").await,
            (StatusCode::NOT_FOUND, "<main>missing</main>".to_string())
        );
    }
}
