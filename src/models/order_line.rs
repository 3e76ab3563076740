use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ContainerType;

/// One product line of a member's weekly order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub order_id: String,
    pub user_id: String,
    pub week: u32,
    pub product_id: String,
    pub quantity: f64,
    pub container: ContainerType,
    pub updated_at: DateTime<Utc>,
}

impl OrderLine {
    pub fn new(
        order_id: impl Into<String>,
        user_id: impl Into<String>,
        week: u32,
        product_id: impl Into<String>,
        quantity: f64,
        container: ContainerType,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            user_id: user_id.into(),
            week,
            product_id: product_id.into(),
            quantity,
            container,
            updated_at: Utc::now(),
        }
    }
}

impl fmt::Display for OrderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} ({})",
            self.quantity,
            self.product_id,
            self.container.label()
        )
    }
}
