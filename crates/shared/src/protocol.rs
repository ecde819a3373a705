use serde::{Deserialize, Serialize};

use crate::domain::{LineItem, Yen};

pub const PRODUCTS_ROUTE: &str = "products";
pub const PURCHASE_ROUTE: &str = "purchase";

/// `GET /products/{code}` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub name: String,
    pub price: Yen,
}

/// `POST /purchase` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub items: Vec<LineItem>,
}

/// `POST /purchase` success body. The total includes tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub total: Yen,
}
