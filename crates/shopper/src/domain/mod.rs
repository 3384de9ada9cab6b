//! Use cases.
//!
//! Thin operations the screen containers call instead of reaching into the
//! repositories directly.

mod add_to_cart;
mod get_cart_item_count;
mod get_products;

pub use add_to_cart::AddToCart;
pub use get_cart_item_count::{CartItemCount, GetCartItemCount};
pub use get_products::GetProducts;
