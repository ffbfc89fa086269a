//! Domain models for storefront.
//!
//! Catalog and cart types come from `qkart_core`; this module holds what
//! only the web layer needs: the session context, notifications and the
//! header view model.

pub mod header;
pub mod notification;
pub mod session;

pub use header::HeaderView;
pub use notification::{Level, Notification};
pub use session::{SessionContext, keys as session_keys};
