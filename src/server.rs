use crate::catalog::Catalog;
use crate::query::{self, QueryError};
use crate::render;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use failure::Fail;
use log::{error, info, warn};

use std::io;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub const BIND_ADDRESS: &str = "0.0.0.0:8081";
pub const ASSETS_DIR: &str = "www";

const INDEX_PAGE: &str = "index.html";
const SEARCH_PAGE: &str = "prop_search.html";
const TABLE_PAGE: &str = "proptable.html";

const HTML: &str = "text/html";
const CSS: &str = "text/css";
const JAVASCRIPT: &str = "text/javascript";

#[derive(Debug, Fail)]
pub enum ServerError {
    #[fail(display = "Asset not found: {}", _0)]
    AssetNotFound(String),
    #[fail(display = "Unable to read asset {}: {}", _0, _1)]
    AssetIo(String, io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::AssetNotFound(_) => {
                warn!("{}", self);
                (StatusCode::NOT_FOUND, "not found").into_response()
            }
            ServerError::AssetIo(..) => {
                error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

/// Shared by every request. The catalog is never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub assets_dir: PathBuf,
}

/// First value of `key` in a decoded query string. Later repetitions are ignored.
fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/prop_search.html", get(property_search))
        .fallback(static_asset)
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<(), failure::Error> {
    let address: SocketAddr = BIND_ADDRESS.parse()?;
    let listener = tokio::net::TcpListener::bind(address).await?;

    info!(
        "Serving {} properties on http://{}",
        state.catalog.row_count(),
        address
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn read_asset(assets_dir: &Path, name: &str) -> Result<String, ServerError> {
    let path = assets_dir.join(name);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ServerError::AssetNotFound(path.display().to_string()),
            _ => ServerError::AssetIo(path.display().to_string(), err),
        })
}

fn with_content_type(content_type: &'static str, body: String) -> Response {
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn index(State(state): State<AppState>) -> Result<Response, ServerError> {
    info!("GET /{}", INDEX_PAGE);
    let page = read_asset(&state.assets_dir, INDEX_PAGE).await?;
    Ok(with_content_type(HTML, page))
}

async fn property_search(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    // Used verbatim: the lookup itself decides what matches.
    let property_name = match first_param(&params, "property_name") {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => {
            let page = read_asset(&state.assets_dir, SEARCH_PAGE).await?;
            return Ok(with_content_type(HTML, page));
        }
    };
    let radius = first_param(&params, "radius").map(query::parse_radius);

    info!("property={} radius={:?}", property_name, radius);

    let table = match query::find_nearby(&state.catalog, &property_name, radius) {
        Ok(result) => render::render_table(&result),
        Err(err @ QueryError::PropertyNotFound(_)) => {
            info!("{}", err);
            let body = format!(
                "property {} not found",
                render::escape_html(&property_name)
            );
            let mut response = with_content_type(HTML, body);
            *response.status_mut() = StatusCode::NOT_FOUND;
            return Ok(response);
        }
    };

    let template = read_asset(&state.assets_dir, TABLE_PAGE).await?;
    Ok(with_content_type(HTML, render::fill_template(&template, &table)))
}

/// `.css` and `.js` files below the assets directory.
async fn static_asset(State(state): State<AppState>, uri: Uri) -> Result<Response, ServerError> {
    let path = uri.path().trim_start_matches('/');
    info!("GET /{}", path);

    let relative = Path::new(path);
    let is_plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if path.is_empty() || !is_plain {
        return Err(ServerError::AssetNotFound(path.to_owned()));
    }

    let content_type = if path.ends_with(".css") {
        CSS
    } else if path.ends_with(".js") {
        JAVASCRIPT
    } else {
        return Err(ServerError::AssetNotFound(path.to_owned()));
    };

    let contents = read_asset(&state.assets_dir, path).await?;
    Ok(with_content_type(content_type, contents))
}
