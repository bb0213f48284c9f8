use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Order placement request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "crate::dto::check_delivery_window"))]
pub struct CreateOrder {
    /// Customer placing the order
    #[validate(length(min = 1, max = 64))]
    pub customer_name: String,
    /// Ordered lines
    #[validate(length(min = 1), nested)]
    pub lines: Vec<OrderLine>,
    /// Free-form labels
    #[garde(inner(ascii))]
    pub labels: Vec<String>,
    /// Promotion code
    /// doc-ignore
    pub promo_code: Option<String>,
    #[serde(default)]
    pub gift: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    /// Stock keeping unit
    pub sku: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct OrderFilter {
    pub customer_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Shipped,
}

fn check_delivery_window(order: &CreateOrder) -> Result<(), ValidationError> {
    Ok(())
}
