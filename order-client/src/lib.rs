//! Client library for the self-ordering system
//!
//! Used by both customer-facing and kitchen-facing frontends:
//!
//! - [`cart`]: the customer's in-progress selection, persisted locally
//!   so a reload restores it exactly
//! - [`checkout`]: the client half of the order submission pipeline
//!   (validation gate, create, payment handoff, cart clearing)
//! - [`kitchen`]: the kitchen display's polling sync service with
//!   sequence-checked reconciliation and optimistic status advance
//! - [`http`]: the HTTP transport behind the [`OrderApi`] trait

pub mod cart;
pub mod checkout;
pub mod error;
pub mod http;
pub mod kitchen;

// Re-exports
pub use cart::{Cart, CartItem, CartStore, JsonFileStore, MemoryStore};
pub use checkout::{Checkout, CustomerDetails, PaymentHandoff, Receipt, SubmitError};
pub use error::{ClientError, ClientResult};
pub use http::{NetworkHttpClient, OrderApi};
pub use kitchen::{KitchenSync, KitchenTicket, SyncError};
