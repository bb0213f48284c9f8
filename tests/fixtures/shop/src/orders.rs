use crate::dto::{CreateOrder, OrderFilter, OrderView};
use actix_web::web::{Json, Path, Query};
use actix_web::{delete, get, post, route, HttpResponse};
use uuid::Uuid;

/// Places an order
///
/// Stock is reserved immediately.
/// @author Dan
#[post("/new")]
pub async fn create_order(body: Json<CreateOrder>) -> Result<Json<OrderView>, ApiError> {
    todo!()
}

/// Shows one order
#[get("/{id}")]
pub async fn show_order(id: Path<Uuid>) -> Json<OrderView> {
    todo!()
}

#[route("/search", "/find", method = "GET", method = "POST")]
pub async fn search(query: Query<OrderFilter>) -> Json<Vec<OrderView>> {
    todo!()
}

/// Cancels an order
#[delete("/{id}")]
#[deprecated]
pub async fn cancel_order(id: Path<Uuid>) -> HttpResponse {
    todo!()
}

fn not_a_handler() {}
