use crate::{config::ServerConfiguration, state::AppState};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod extractor;

mod handler;
mod responder;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/.well-known", handler::well_known::routes())
        .nest("/nodeinfo", handler::nodeinfo::routes())
        .nest("/posts", handler::posts::routes())
        .nest("/users", handler::users::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[instrument(skip_all, fields(port = %server_config.port))]
pub async fn run(state: AppState, server_config: ServerConfiguration) -> eyre::Result<()> {
    let router = create_router(state);
    let listener = TcpListener::bind(("0.0.0.0", server_config.port)).await?;

    info!("tanuki is listening");
    axum::serve(listener, router).await?;

    Ok(())
}
