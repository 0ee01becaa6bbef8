//! Development server rendering documents and listings on request

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::DatasetKind;
use crate::error::PageError;
use crate::generator::{Generator, LinkStyle};
use crate::listing::{parse_start_offset, ListingQuery};
use crate::Site;

/// Server state
struct ServerState {
    generator: Generator,
    public_dir: PathBuf,
    data_dir: PathBuf,
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        generator: Generator::new(site)?,
        public_dir: site.public_dir.clone(),
        data_dir: site.data_dir.clone(),
    });

    let app = Router::new()
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Render the page behind a request path.
///
/// The first path segment picks a collection or a listing; anything else is not found.
pub fn render_path(
    generator: &Generator,
    path: &str,
    params: &HashMap<String, String>,
) -> Result<String, PageError> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return generator.home_page();
    }

    let (head, rest) = path.split_once('/').unwrap_or((path, ""));

    if let Some(collection) = generator.collection_by_route(head) {
        let query = ListingQuery::from_map(params);
        return if rest.is_empty() {
            generator.collection_page(collection, &query, LinkStyle::Query)
        } else {
            generator.document_page(collection, rest)
        };
    }

    if let Some(dataset) = generator.dataset_by_route(head) {
        if rest.is_empty() {
            let query = ListingQuery::from_map(params);
            return generator.dataset_page(dataset, &query, LinkStyle::Query);
        }
        if dataset.kind == DatasetKind::Interviews && !rest.contains('/') {
            let start = parse_start_offset(params.get("t").map(String::as_str));
            return generator.interview_page(dataset, rest, start);
        }
    }

    Err(PageError::NotFound)
}

/// Rendered pages first, then generated and data files, then the not-found page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request<Body>,
) -> Response {
    let path = percent_decode_str(request.uri().path())
        .decode_utf8_lossy()
        .into_owned();

    match render_path(&state.generator, &path, &params) {
        Ok(html) => Html(html).into_response(),
        Err(PageError::Compile(e)) => {
            tracing::error!("{}: {}", path, e);
            let html = state.generator.error_page(&e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
        }
        Err(PageError::Render(e)) => {
            tracing::error!("{}: {:#}", path, e);
            let html = state.generator.error_page("ページを表示できませんでした。");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
        }
        Err(PageError::NotFound) => serve_static(&state, request).await,
    }
}

async fn serve_static(state: &ServerState, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.public_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeDir::new(&state.data_dir));

    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => {
            let html = state.generator.not_found_page();
            (StatusCode::NOT_FOUND, Html(html)).into_response()
        }
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
