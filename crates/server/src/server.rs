use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{budgets, categories, expenses, incomes};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/budgets", get(budgets::list))
        .route("/budget", post(budgets::create))
        .route(
            "/budget/{id}",
            get(budgets::get)
                .patch(budgets::update)
                .delete(budgets::delete),
        )
        .route("/incomes", get(incomes::list))
        .route("/income", post(incomes::create))
        .route(
            "/income/{id}",
            get(incomes::get)
                .patch(incomes::update)
                .delete(incomes::delete),
        )
        .route("/expenses", get(expenses::list))
        .route("/expense", post(expenses::create))
        .route(
            "/expense/{id}",
            get(expenses::get)
                .patch(expenses::update)
                .delete(expenses::delete),
        )
        .route("/expense/{id}/categories", get(expenses::categories))
        .route(
            "/expense/{id}/categories/{category_id}",
            post(expenses::tag).delete(expenses::untag),
        )
        .route("/categories", get(categories::list))
        .route("/category", post(categories::create))
        .route(
            "/category/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
