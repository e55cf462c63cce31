//! Server-rendered web front end: search form, results, and static pages.

use crate::search::{PriceBucket, SearchHit, SearchIndex};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

/// Shared handler state.
pub type AppState = Arc<SearchIndex>;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/home", get(home))
        .route("/products", get(products))
        .route("/about", get(about))
        .route("/search", post(search))
        .with_state(state)
}

/// Binds and serves until the process exits.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Search errors surface as a 500 page; the cause goes to the log.
struct WebError(anyhow::Error);

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        let body = layout(
            "Error",
            "<h2>Something went wrong</h2>\
             <p>The search index could not be queried. Try again later.</p>",
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for WebError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Deserialize)]
struct SearchForm {
    search: String,
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let status = index_status(&state);
    let body = format!(
        r#"<h2>Search gaming mice</h2>
<form method="post" action="/search">
    <input type="text" name="search" placeholder="e.g. Logitech" autofocus>
    <button type="submit">Search</button>
</form>
<p class="status">{status}</p>"#
    );
    Html(layout("Home", &body))
}

async fn products(State(state): State<AppState>) -> Html<String> {
    let status = index_status(&state);
    let body = format!(
        r#"<h2>Products</h2>
<p>The index holds gaming mice scraped from the Trendyol best-seller listing,
with price, rating count, and detail-page attributes (DPI, RGB lighting,
type, button count).</p>
<p class="status">{status}</p>"#
    );
    Html(layout("Products", &body))
}

async fn about() -> Html<String> {
    let body = "<h2>About</h2>\
<p>trendyol-scout scrapes a single Trendyol category listing into a local \
full-text index and serves keyword search with price-range facets.</p>";
    Html(layout("About", body))
}

async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, WebError> {
    // The raw form text is passed straight through; empty is allowed.
    let outcome = state.search(&form.search)?;

    info!("Search {:?}: {} hits", form.search, outcome.hits.len());

    let mut body = format!("<h2>Results for \u{201c}{}\u{201d}</h2>", escape_html(&form.search));
    body.push_str(&render_hits(&outcome.hits));
    body.push_str(&render_buckets(&outcome.buckets));

    Ok(Html(layout("Results", &body)))
}

fn index_status(index: &SearchIndex) -> String {
    let generation = index.generation().unwrap_or(0);
    format!("Index generation {generation}, {} products", index.num_docs())
}

fn render_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "<p>No products matched.</p>".to_string();
    }

    let mut out = String::from(
        "<table>\
<tr><th>Name</th><th>Price</th><th>Rating count</th>\
<th>DPI</th><th>RGB</th><th>Type</th><th>Buttons</th></tr>",
    );

    for hit in hits {
        let name = hit.name.as_deref().unwrap_or("N/A");
        let price = hit
            .prices
            .first()
            .map(|p| format!("{p:.2} TL"))
            .unwrap_or_else(|| "N/A".to_string());
        let rating = hit.rating_count.as_deref().unwrap_or("N/A");

        let attr = |key: &str| {
            hit.attributes
                .get(key)
                .and_then(|v| v.as_deref())
                .unwrap_or("N/A")
                .to_string()
        };

        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(name),
            escape_html(&price),
            escape_html(rating),
            escape_html(&attr("dpi")),
            escape_html(&attr("rgb_lighting")),
            escape_html(&attr("mouse_type")),
            escape_html(&attr("button_count")),
        ));
    }

    out.push_str("</table>");
    out
}

fn render_buckets(buckets: &[PriceBucket]) -> String {
    let mut out = String::from("<h3>Price ranges</h3><ul>");
    for bucket in buckets {
        out.push_str(&format!(
            "<li>{}: {} product(s)</li>",
            escape_html(&bucket.key),
            bucket.count
        ));
    }
    out.push_str("</ul>");
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - trendyol-scout</title>
<style>
body {{ font-family: sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
.status {{ color: #666; font-size: 0.9rem; }}
</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/products">Products</a><a href="/about">About</a></nav>
{body}
</body>
</html>"#
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
