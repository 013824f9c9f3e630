//! Dispatch middleware.
//! Hands every request to the production handler; declined requests
//! continue down the stack.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handler::{Handler, Outcome};
use crate::http::request::request_id;

pub async fn dispatch<C>(
    State(handler): State<Arc<Handler<C>>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    C: Send + Sync + 'static,
{
    let id = request_id(&req).to_string();
    match handler.handle(req).await {
        Ok(Outcome::Response(res)) => res,
        Ok(Outcome::Next(req)) => next.run(req).await,
        Err(e) => {
            tracing::warn!(request_id = %id, error = %e, "Rejected request");
            e.into_response()
        }
    }
}
