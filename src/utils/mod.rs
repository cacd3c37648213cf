//! # Utility Modules
//!
//! Supporting utilities for cryptography, logging and timing.
//!
//! ## Components
//! - **Crypto**: identity keypairs, signing and verification
//! - **Logging**: structured logging configuration
//! - **Timeout**: async timeout wrappers

pub mod crypto;
pub mod logging;
pub mod timeout;

pub use crypto::{Identity, PeerKey};
