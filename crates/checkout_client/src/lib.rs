//! Client side of the checkout register: talks to the product lookup and
//! purchase services and keeps the cashier's session consistent.

pub mod controller;
pub mod error;
pub mod session;
pub mod transport;

pub use controller::CheckoutController;
pub use error::{BackendError, CheckoutError, ValidationError};
pub use session::{LookupDraft, PurchaseResult, ResolvedProduct, Session};
pub use transport::{CheckoutBackend, HttpCheckoutBackend};
