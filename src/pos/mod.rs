//! Cliente para a API de integração POS da Wolt.

pub mod client;
pub mod error;
pub mod types;

pub use client::PosClient;
pub use error::PosApiError;
pub use types::{ItemUpdate, ItemsUpdate, MenuDocument, MenuSnapshot};
