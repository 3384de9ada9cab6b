//! Screen state containers.
//!
//! Each container owns a serializable snapshot of one screen, published over
//! a `watch` channel, and exposes the operations that screen can trigger.
//! Rendering is left to whatever consumes the snapshots.

mod cart;
mod home;
mod product;

pub use cart::{CartState, CartViewModel};
pub use home::{HomeState, HomeViewModel};
pub use product::{ProductState, ProductViewModel};

use serde::Serialize;

/// One-shot message shown to the user, cleared with `on_message_shown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiMessage {
    /// The product list could not be loaded.
    CannotGetProducts,
    /// The selected product no longer exists in the catalog.
    ProductUnavailable,
    /// A cart change could not be saved.
    CartNotSaved,
}

impl UiMessage {
    /// Text shown to the user.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::CannotGetProducts => "Cannot get products",
            Self::ProductUnavailable => "This product is no longer available",
            Self::CartNotSaved => "Your cart could not be saved",
        }
    }
}

impl std::fmt::Display for UiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_and_serialized_name() {
        assert_eq!(UiMessage::CannotGetProducts.to_string(), "Cannot get products");
        assert_eq!(
            serde_json::to_string(&UiMessage::CartNotSaved).unwrap(),
            "\"cart_not_saved\""
        );
    }
}
