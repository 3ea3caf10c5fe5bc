//! View controllers.
//!
//! Each controller is bound to the [`ViewScope`](crate::router::ViewScope) of the
//! view it backs. Once the user navigates away, its requests resolve to
//! [`ClientError::Cancelled`](crate::error::ClientError::Cancelled) and never touch
//! its state.

pub mod chat;
pub mod dashboard;
pub mod list;
pub mod validation;

pub use chat::{Author, ChatMessage, ChatSession, APOLOGY_MESSAGE};
pub use dashboard::{DashboardSummary, EquipmentSummary, Section};
pub use list::ListView;
pub use validation::{FormErrors, Validate};
