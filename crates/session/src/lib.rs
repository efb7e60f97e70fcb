//! Trolley session
//!
//! Async persistence and sharing layer over the core `trolley` engine: cart
//! gateways, share ids and the per-user [`session::CartSession`].

pub mod errors;
pub mod gateway;
pub mod ids;
pub mod session;

pub use errors::GatewayError;
pub use gateway::{CartGateway, SavedCart, local::JsonFileGateway, memory::MemoryGateway};
pub use session::CartSession;
