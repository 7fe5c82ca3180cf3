//! Shared types for the self-ordering system
//!
//! Common types used by both the order server and the client library:
//! menu and site models, order types with the status state machine,
//! customer input validation, and API request/response DTOs.

pub mod client;
pub mod models;
pub mod order;
pub mod validate;

// Re-exports
pub use models::{MenuItem, MenuItemCategory, SiteConfig};
pub use order::{Order, OrderLine, OrderStatus, OrderType, PaymentStatus};
pub use validate::ValidationError;
