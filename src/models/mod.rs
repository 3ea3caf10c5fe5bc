//! Records exchanged with the inventory backend.

pub mod chatbot;
pub mod employee;
pub mod equipment;
pub mod location;
pub mod user;

pub use chatbot::*;
pub use employee::*;
pub use equipment::*;
pub use location::*;
pub use user::*;
