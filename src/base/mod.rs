//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): error codes shared by the transport, the
//!   session and the stores
//! - [`ConnectionState`](connstate::ConnectionState): session connection states

pub mod connstate;
pub mod context;
pub mod neterror;
