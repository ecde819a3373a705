use super::*;
use async_trait::async_trait;
use checkout_client::{BackendError, CheckoutBackend};
use shared::{
    domain::{LineItem, ProductCode, Yen},
    protocol::{ProductResponse, PurchaseResponse},
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

#[derive(Default)]
struct CountingBackend {
    lookups: AtomicUsize,
    purchases: AtomicUsize,
}

#[async_trait]
impl CheckoutBackend for CountingBackend {
    async fn lookup_product(&self, code: &ProductCode) -> Result<ProductResponse, BackendError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match code.as_str() {
            "A1" => Ok(ProductResponse {
                name: "Pen".to_string(),
                price: Yen(100),
            }),
            _ => Err(BackendError::Service {
                status: 404,
                detail: "商品が見つかりません".to_string(),
            }),
        }
    }

    async fn submit_purchase(&self, items: &[LineItem]) -> Result<PurchaseResponse, BackendError> {
        self.purchases.fetch_add(1, Ordering::SeqCst);
        let subtotal: Yen = items.iter().map(LineItem::subtotal).sum();
        Ok(PurchaseResponse {
            total: Yen(subtotal.0 * 110 / 100),
        })
    }
}

fn register() -> (CheckoutController, Arc<CountingBackend>) {
    let backend = Arc::new(CountingBackend::default());
    (CheckoutController::new(backend.clone()), backend)
}

fn cmd(line: &str) -> RegisterCommand {
    RegisterCommand::parse(line).expect("command")
}

#[test]
fn parses_keywords_and_bare_codes() {
    assert_eq!(RegisterCommand::parse("   "), None);
    assert_eq!(cmd("add"), RegisterCommand::AddToCart);
    assert_eq!(cmd(" buy "), RegisterCommand::Purchase);
    assert_eq!(cmd("purchase"), RegisterCommand::Purchase);
    assert_eq!(cmd("close"), RegisterCommand::ClosePopup);
    assert_eq!(cmd("exit"), RegisterCommand::Quit);
    assert_eq!(cmd("lookup"), RegisterCommand::Lookup(None));
    assert_eq!(
        cmd("lookup  A1 "),
        RegisterCommand::Lookup(Some("A1".to_string()))
    );
    assert_eq!(cmd("code B2"), RegisterCommand::EditCode("B2".to_string()));
    assert_eq!(cmd("code"), RegisterCommand::EditCode(String::new()));
    assert_eq!(
        cmd("4901234567894"),
        RegisterCommand::Lookup(Some("4901234567894".to_string()))
    );
}

#[tokio::test]
async fn scan_add_buy_close_cycle() {
    let (controller, backend) = register();

    assert_eq!(execute(&controller, cmd("A1")).await, Outcome::Render);
    assert_eq!(execute(&controller, cmd("add")).await, Outcome::Render);
    assert_eq!(execute(&controller, cmd("buy")).await, Outcome::Render);

    let session = controller.snapshot().await;
    assert!(session.popup_visible);
    assert_eq!(session.purchase.total, Yen(110));
    assert_eq!(backend.purchases.load(Ordering::SeqCst), 1);

    assert_eq!(execute(&controller, cmd("close")).await, Outcome::Render);
    let session = controller.snapshot().await;
    assert!(!session.popup_visible);
    assert!(session.cart.is_empty());
}

#[tokio::test]
async fn lookup_without_argument_uses_code_field() {
    let (controller, backend) = register();

    execute(&controller, cmd("code A1")).await;
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);

    execute(&controller, cmd("lookup")).await;
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(controller.snapshot().await.draft.name(), Some("Pen"));
}

#[tokio::test]
async fn empty_code_field_lookup_reports_validation_error() {
    let (controller, backend) = register();

    assert_eq!(execute(&controller, cmd("lookup")).await, Outcome::Render);
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(
        controller.snapshot().await.draft.error.as_deref(),
        Some("商品コードを入力してください")
    );
}

#[tokio::test]
async fn open_receipt_blocks_other_commands() {
    let (controller, backend) = register();
    execute(&controller, cmd("A1")).await;
    execute(&controller, cmd("add")).await;
    execute(&controller, cmd("buy")).await;

    assert!(matches!(
        execute(&controller, cmd("buy")).await,
        Outcome::Notice(_)
    ));
    assert!(matches!(
        execute(&controller, cmd("A1")).await,
        Outcome::Notice(_)
    ));
    assert_eq!(backend.purchases.load(Ordering::SeqCst), 1);
    assert_eq!(backend.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(execute(&controller, cmd("show")).await, Outcome::Render);
}

#[tokio::test]
async fn close_without_receipt_keeps_cart() {
    let (controller, _) = register();
    execute(&controller, cmd("A1")).await;
    execute(&controller, cmd("add")).await;

    assert!(matches!(
        execute(&controller, cmd("close")).await,
        Outcome::Notice(_)
    ));
    assert_eq!(controller.snapshot().await.cart.len(), 1);
}

#[tokio::test]
async fn help_and_quit_do_not_touch_session() {
    let (controller, _) = register();
    assert_eq!(execute(&controller, cmd("help")).await, Outcome::Help);
    assert_eq!(execute(&controller, cmd("quit")).await, Outcome::Quit);
    assert_eq!(controller.snapshot().await, checkout_client::Session::new());
}
