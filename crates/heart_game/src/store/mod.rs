//! Durable storage for user profiles.

mod error;
mod repository;

pub use error::StoreError;
pub use repository::UserStore;
