use std::sync::Arc;

use chrono::Utc;
use shared::domain::{LineItem, ProductCode, Yen};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{
    error::{BackendError, CheckoutError, ValidationError},
    session::{Action, ResolvedProduct, Session},
    transport::CheckoutBackend,
};

const SESSION_EVENT_CAPACITY: usize = 64;

/// Runs checkout operations against a backend and publishes every resulting session.
///
/// The session lock is released before any request is sent, so lookups stay
/// responsive while a purchase is outstanding.
pub struct CheckoutController {
    backend: Arc<dyn CheckoutBackend>,
    session: Mutex<Session>,
    events: broadcast::Sender<Session>,
}

impl CheckoutController {
    pub fn new(backend: Arc<dyn CheckoutBackend>) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            backend,
            session: Mutex::new(Session::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Session> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn edit_code(&self, code: impl Into<String>) {
        self.dispatch(Action::CodeEdited(code.into())).await;
    }

    pub async fn lookup_product(&self, raw_code: &str) -> Result<ResolvedProduct, CheckoutError> {
        let code = match ProductCode::parse(raw_code) {
            Ok(code) => code,
            Err(_) => {
                self.dispatch(Action::LookupInvalid(ValidationError::MissingCode))
                    .await;
                return Err(ValidationError::MissingCode.into());
            }
        };

        self.dispatch(Action::LookupStarted {
            code: raw_code.to_string(),
        })
        .await;

        match self.backend.lookup_product(&code).await {
            Ok(res) => {
                let product = ResolvedProduct {
                    code,
                    name: res.name,
                    price: res.price,
                };
                info!(code = %product.code, price = product.price.0, "product resolved");
                self.dispatch(Action::LookupSucceeded(product.clone())).await;
                Ok(product)
            }
            Err(BackendError::Service { status, detail }) => {
                warn!(%code, status, %detail, "lookup rejected");
                self.dispatch(Action::LookupRejected {
                    detail: detail.clone(),
                })
                .await;
                Err(BackendError::Service { status, detail }.into())
            }
            Err(err) => {
                warn!(%code, "lookup failed: {err}");
                self.dispatch(Action::LookupUnreachable).await;
                Err(err.into())
            }
        }
    }

    /// Appends the looked-up product. Refused with [`CheckoutError::Busy`] while a
    /// purchase is outstanding, since the submitted cart is cleared on completion.
    pub async fn add_to_cart(&self) -> Result<LineItem, CheckoutError> {
        let mut guard = self.session.lock().await;
        if guard.purchase_in_flight {
            warn!("purchase in flight; refusing to change the cart");
            return Err(CheckoutError::Busy);
        }
        match guard.pending_line_item() {
            Ok(item) => {
                self.commit(&mut guard, Action::ItemAdded(item.clone()));
                info!(code = %item.code, lines = guard.cart.len(), "item added to cart");
                Ok(item)
            }
            Err(err) => {
                self.commit(&mut guard, Action::AddRejected(err));
                Err(err.into())
            }
        }
    }

    /// Sends the cart to the purchase service and returns the taxed total.
    ///
    /// A second call while one is outstanding returns [`CheckoutError::Busy`]
    /// without touching the session.
    pub async fn submit_purchase(&self) -> Result<Yen, CheckoutError> {
        let items = self.begin_purchase().await?;
        info!(lines = items.len(), "submitting purchase");

        match self.backend.submit_purchase(&items).await {
            Ok(res) => {
                let at = Utc::now();
                info!(total = res.total.0, completed_at = %at, "purchase completed");
                self.dispatch(Action::PurchaseCompleted {
                    total: res.total,
                    at,
                })
                .await;
                Ok(res.total)
            }
            Err(BackendError::Service { status, detail }) => {
                warn!(status, %detail, "purchase rejected");
                self.dispatch(Action::PurchaseRejected {
                    detail: detail.clone(),
                })
                .await;
                Err(BackendError::Service { status, detail }.into())
            }
            Err(err) => {
                warn!("purchase failed: {err}");
                self.dispatch(Action::PurchaseUnreachable).await;
                Err(err.into())
            }
        }
    }

    pub async fn close_purchase_popup(&self) {
        self.dispatch(Action::PopupClosed).await;
    }

    async fn begin_purchase(&self) -> Result<Vec<LineItem>, CheckoutError> {
        let mut guard = self.session.lock().await;
        if guard.purchase_in_flight {
            warn!("purchase already in flight; ignoring submission");
            return Err(CheckoutError::Busy);
        }
        match guard.purchase_items() {
            Ok(items) => {
                self.commit(&mut guard, Action::PurchaseStarted);
                Ok(items)
            }
            Err(err) => {
                self.commit(&mut guard, Action::PurchaseInvalid(err));
                Err(err.into())
            }
        }
    }

    async fn dispatch(&self, action: Action) {
        let mut guard = self.session.lock().await;
        self.commit(&mut guard, action);
    }

    fn commit(&self, session: &mut Session, action: Action) {
        let next = std::mem::take(session).apply(action);
        *session = next;
        let _ = self.events.send(session.clone());
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
