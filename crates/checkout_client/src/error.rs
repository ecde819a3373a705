use thiserror::Error;

/// Shown when the lookup request never produced a usable response.
pub const LOOKUP_UNREACHABLE_MESSAGE: &str = "サーバーに接続できませんでした";
/// Shown when the purchase request never produced a usable response.
pub const PURCHASE_FAILED_MESSAGE: &str = "購入処理に失敗しました";

/// Local precondition failures. No request is sent when one of these fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("商品コードを入力してください")]
    MissingCode,
    #[error("商品コードを読み込んでください")]
    LookupRequired,
    #[error("購入リストが空です")]
    EmptyCart,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Non-success status carrying a `{ detail }` body.
    #[error("service rejected request with status {status}: {detail}")]
    Service { status: u16, detail: String },
    /// Unreachable host, timeout, or a body that did not decode.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl BackendError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("a purchase is already being processed")]
    Busy,
}
