use crate::backend::{BackendClient, CatalogApi};
use crate::config::Config;
use crate::fetch::build_client;
use crate::models::MediaKind;
use crate::pages::{
    self,
    details::DetailsParams,
    people::{PeopleAction, PeopleParams},
    person::PersonParams,
    works::{WorkAction, WorkParams},
    Outcome,
};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub tmdb: Arc<dyn TmdbApi>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_client()?;
        Ok(Self {
            catalog: Arc::new(BackendClient::new(client.clone(), config)),
            tmdb: Arc::new(TmdbClient::new(client, config)),
        })
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    info!("Using catalog backend at {}", config.backend_url);

    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/movies") }))
        .route("/movies", get(movies))
        .route("/movies/languages", get(movie_languages))
        .route("/shows", get(shows))
        .route("/shows/languages", get(show_languages))
        .route("/actors", get(actors))
        .route("/actors/genders", get(actor_genders))
        .route("/details", get(details))
        .route("/person", get(person))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

fn respond(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Page(view) => Html(view.into_html()).into_response(),
        Outcome::Redirect(to) => Redirect::to(&to).into_response(),
    }
}

/// Query strings serde cannot read (a repeated key, say) count as no query,
/// so the page falls back to its initial load.
fn params_or_default<T: Default>(query: Option<Query<T>>) -> T {
    query.map(|Query(params)| params).unwrap_or_default()
}

async fn works_page(
    state: &AppState,
    kind: MediaKind,
    query: Option<Query<WorkParams>>,
) -> Response {
    let action = WorkAction::from_params(&params_or_default(query));
    respond(pages::works::handle(state.catalog.as_ref(), state.tmdb.as_ref(), kind, action).await)
}

async fn movies(State(state): State<AppState>, query: Option<Query<WorkParams>>) -> Response {
    works_page(&state, MediaKind::Movie, query).await
}

async fn shows(State(state): State<AppState>, query: Option<Query<WorkParams>>) -> Response {
    works_page(&state, MediaKind::Tv, query).await
}

async fn movie_languages(State(state): State<AppState>) -> Response {
    respond(pages::works::languages(state.tmdb.as_ref(), MediaKind::Movie).await)
}

async fn show_languages(State(state): State<AppState>) -> Response {
    respond(pages::works::languages(state.tmdb.as_ref(), MediaKind::Tv).await)
}

async fn actors(State(state): State<AppState>, query: Option<Query<PeopleParams>>) -> Response {
    let action = PeopleAction::from_params(&params_or_default(query));
    respond(pages::people::handle(state.catalog.as_ref(), state.tmdb.as_ref(), action).await)
}

async fn actor_genders() -> Response {
    respond(pages::people::genders())
}

async fn details(
    State(state): State<AppState>,
    query: Option<Query<DetailsParams>>,
) -> Response {
    let params = params_or_default(query);
    respond(pages::details::handle(state.catalog.as_ref(), state.tmdb.as_ref(), &params).await)
}

async fn person(State(state): State<AppState>, query: Option<Query<PersonParams>>) -> Response {
    let params = params_or_default(query);
    respond(pages::person::handle(state.tmdb.as_ref(), &params).await)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
