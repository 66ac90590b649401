//! Posts, likes and comments over a document store, behind bearer-token auth.

pub mod comment;
pub mod config;
pub mod database;
pub mod middleware;
pub mod post;
pub mod router;
pub mod user;
pub mod utils;

pub use router::index::AppState;
