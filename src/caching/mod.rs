//! Module to cache generated routes.

pub mod lru;
pub mod routes;
