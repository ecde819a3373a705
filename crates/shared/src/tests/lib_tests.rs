use crate::{
    domain::{LineItem, ProductCode, Yen},
    error::{ErrorBody, ProductCodeError},
    protocol::{ProductResponse, PurchaseRequest, PurchaseResponse},
};

fn code(raw: &str) -> ProductCode {
    ProductCode::parse(raw).expect("code")
}

#[test]
fn product_code_trims_scanner_whitespace() {
    assert_eq!(code("  A1\n").as_str(), "A1");
}

#[test]
fn product_code_rejects_blank_input() {
    assert_eq!(ProductCode::parse(""), Err(ProductCodeError::Empty));
    assert_eq!(ProductCode::parse("   "), Err(ProductCodeError::Empty));
}

#[test]
fn purchase_request_serializes_items_in_cart_order() {
    let request = PurchaseRequest {
        items: vec![
            LineItem::single(code("A1"), "Pen", Yen(100)),
            LineItem::single(code("B2"), "Notebook", Yen(250)),
        ],
    };

    let value = serde_json::to_value(&request).expect("json");
    assert_eq!(
        value,
        serde_json::json!({
            "items": [
                { "code": "A1", "name": "Pen", "price": 100, "quantity": 1 },
                { "code": "B2", "name": "Notebook", "price": 250, "quantity": 1 },
            ]
        })
    );
}

#[test]
fn decodes_service_bodies() {
    let product: ProductResponse =
        serde_json::from_str(r#"{"name":"Pen","price":100}"#).expect("product");
    assert_eq!(product.price, Yen(100));

    let purchase: PurchaseResponse = serde_json::from_str(r#"{"total":110}"#).expect("purchase");
    assert_eq!(purchase.total, Yen(110));

    let err: ErrorBody =
        serde_json::from_str(r#"{"detail":"商品が見つかりません"}"#).expect("error body");
    assert_eq!(err.detail, "商品が見つかりません");
}

#[test]
fn rejects_negative_price() {
    assert!(serde_json::from_str::<ProductResponse>(r#"{"name":"Pen","price":-1}"#).is_err());
    assert!(serde_json::from_str::<ProductResponse>(r#"{"name":"Pen","price":-0.6}"#).is_err());
    assert!(serde_json::from_str::<ProductResponse>(r#"{"name":"Pen","price":"100"}"#).is_err());
}

#[test]
fn decodes_floating_point_amounts_to_whole_yen() {
    for (raw, expected) in [
        (r#"{"total":110.0}"#, 110),
        (r#"{"total":110.00000000000001}"#, 110),
        (r#"{"total":109.99999999999999}"#, 110),
        (r#"{"total":110.5}"#, 111),
        (r#"{"total":110.49}"#, 110),
    ] {
        let purchase: PurchaseResponse = serde_json::from_str(raw).expect(raw);
        assert_eq!(purchase.total, Yen(expected), "{raw}");
    }

    let product: ProductResponse =
        serde_json::from_str(r#"{"name":"Pen","price":100.0}"#).expect("product");
    assert_eq!(product.price, Yen(100));
}

#[test]
fn amounts_serialize_as_integers() {
    assert_eq!(
        serde_json::to_string(&PurchaseResponse { total: Yen(110) }).expect("json"),
        r#"{"total":110}"#
    );
}

#[test]
fn subtotal_multiplies_price_by_quantity() {
    let mut item = LineItem::single(code("A1"), "Pen", Yen(120));
    assert_eq!(item.subtotal(), Yen(120));
    item.quantity = 3;
    assert_eq!(item.subtotal(), Yen(360));
}

#[test]
fn yen_sums_and_displays() {
    let total: Yen = [Yen(100), Yen(250)].into_iter().sum();
    assert_eq!(total, Yen(350));
    assert_eq!(total.to_string(), "350円");
}
