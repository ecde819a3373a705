//! Checkout session state and the reducer that moves it between states.
//!
//! A [`Session`] is a plain value. Every change goes through [`Session::apply`],
//! which consumes the old value and returns the next one; the controller is the
//! only caller that performs I/O around it.

use chrono::{DateTime, Utc};
use shared::domain::{LineItem, ProductCode, Yen};

use crate::error::{ValidationError, LOOKUP_UNREACHABLE_MESSAGE, PURCHASE_FAILED_MESSAGE};

/// A product the lookup service resolved, remembered with the code it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub code: ProductCode,
    pub name: String,
    pub price: Yen,
}

impl ResolvedProduct {
    pub fn to_line_item(&self) -> LineItem {
        LineItem::single(self.code.clone(), self.name.clone(), self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupDraft {
    /// Raw input as typed or scanned; lookups trim it but never rewrite it.
    pub code: String,
    pub product: Option<ResolvedProduct>,
    pub error: Option<String>,
}

impl LookupDraft {
    pub fn name(&self) -> Option<&str> {
        self.product.as_ref().map(|product| product.name.as_str())
    }

    pub fn price(&self) -> Option<Yen> {
        self.product.as_ref().map(|product| product.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseResult {
    pub total: Yen,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub draft: LookupDraft,
    pub cart: Vec<LineItem>,
    pub purchase: PurchaseResult,
    pub popup_visible: bool,
    pub purchase_in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CodeEdited(String),
    LookupInvalid(ValidationError),
    LookupStarted { code: String },
    LookupSucceeded(ResolvedProduct),
    LookupRejected { detail: String },
    LookupUnreachable,
    AddRejected(ValidationError),
    ItemAdded(LineItem),
    PurchaseInvalid(ValidationError),
    PurchaseStarted,
    PurchaseCompleted { total: Yen, at: DateTime<Utc> },
    PurchaseRejected { detail: String },
    PurchaseUnreachable,
    PopupClosed,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The line `add_to_cart` would append, or why it cannot.
    pub fn pending_line_item(&self) -> Result<LineItem, ValidationError> {
        self.draft
            .product
            .as_ref()
            .map(ResolvedProduct::to_line_item)
            .ok_or(ValidationError::LookupRequired)
    }

    /// The payload `submit_purchase` would send, or why it cannot.
    pub fn purchase_items(&self) -> Result<Vec<LineItem>, ValidationError> {
        if self.cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        Ok(self.cart.clone())
    }

    /// Pre-tax sum of the cart lines, for display only.
    pub fn cart_subtotal(&self) -> Yen {
        self.cart.iter().map(LineItem::subtotal).sum()
    }

    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::CodeEdited(code) => {
                self.draft.code = code;
            }
            Action::LookupInvalid(err) => {
                self.draft.product = None;
                self.draft.error = Some(err.to_string());
            }
            Action::LookupStarted { code } => {
                self.draft.code = code;
                self.draft.error = None;
            }
            Action::LookupSucceeded(product) => {
                self.draft.product = Some(product);
                self.draft.error = None;
            }
            Action::LookupRejected { detail } => {
                self.draft.product = None;
                self.draft.error = Some(detail);
            }
            Action::LookupUnreachable => {
                self.draft.error = Some(LOOKUP_UNREACHABLE_MESSAGE.to_string());
            }
            Action::AddRejected(err) => {
                self.draft.error = Some(err.to_string());
            }
            Action::ItemAdded(item) => {
                self.cart.push(item);
                self.draft = LookupDraft::default();
            }
            Action::PurchaseInvalid(err) => {
                self.purchase.error = Some(err.to_string());
            }
            Action::PurchaseStarted => {
                self.purchase_in_flight = true;
                self.purchase.error = None;
            }
            Action::PurchaseCompleted { total, at } => {
                self.purchase_in_flight = false;
                self.purchase.total = total;
                self.purchase.error = None;
                self.purchase.completed_at = Some(at);
                self.popup_visible = true;
            }
            Action::PurchaseRejected { detail } => {
                self.purchase_in_flight = false;
                self.purchase.error = Some(detail);
            }
            Action::PurchaseUnreachable => {
                self.purchase_in_flight = false;
                self.purchase.error = Some(PURCHASE_FAILED_MESSAGE.to_string());
            }
            Action::PopupClosed => {
                self.popup_visible = false;
                self.cart.clear();
                self.draft = LookupDraft::default();
                self.purchase = PurchaseResult::default();
            }
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
