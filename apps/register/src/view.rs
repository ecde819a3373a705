//! Plain-text rendering of the checkout session for the terminal register.

use std::fmt::Write as _;

use checkout_client::Session;

const NAME_PLACEHOLDER: &str = "商品名";
const PRICE_PLACEHOLDER: &str = "単価";
const EMPTY_CART: &str = "購入リストは空です";

pub fn render(session: &Session) -> String {
    let mut out = String::new();
    let draft = &session.draft;

    if let Some(err) = &draft.error {
        let _ = writeln!(out, "! {err}");
    }
    let _ = writeln!(out, "コード: {}", draft.code);
    let _ = writeln!(out, "{}", draft.name().unwrap_or(NAME_PLACEHOLDER));
    match draft.price() {
        Some(price) => {
            let _ = writeln!(out, "{price}");
        }
        None => {
            let _ = writeln!(out, "{PRICE_PLACEHOLDER}");
        }
    }

    let _ = writeln!(out, "--- 購入リスト ---");
    if session.cart.is_empty() {
        let _ = writeln!(out, "{EMPTY_CART}");
    }
    for item in &session.cart {
        let _ = writeln!(
            out,
            "{} x{} {} {}",
            item.name,
            item.quantity,
            item.price,
            item.subtotal()
        );
    }
    if session.purchase_in_flight {
        let _ = writeln!(out, "購入処理中...");
    }
    if let Some(err) = &session.purchase.error {
        let _ = writeln!(out, "! {err}");
    }

    if session.popup_visible {
        let _ = writeln!(out, "{}", receipt_line(session));
        let _ = writeln!(out, "(close で閉じる)");
    }

    out
}

pub fn receipt_line(session: &Session) -> String {
    format!("購入完了！ 合計 {}（税込）", session.purchase.total)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
