//! HTTP adapter: thin REST shell over the conversation service.

mod dto;
mod handlers;
mod routes;

pub use routes::router;
