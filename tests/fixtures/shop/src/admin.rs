use crate::dto::OrderView;
use actix_web::get;
use actix_web::web::Json;

/// Back office
#[scope("/admin")]
pub struct AdminApi;

impl AdminApi {
    /// Lists every order
    #[get("/orders")]
    pub async fn all_orders() -> Json<Vec<OrderView>> {
        todo!()
    }
}

/// @author Erin
pub struct AuditEntry {
    pub action: String,
}

/// @author Erin
/// @author Gus
pub struct AuditFilter {
    pub action: Option<String>,
}
