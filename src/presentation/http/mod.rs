pub mod dto;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod server;

pub use errors::ApiError;
pub use server::HttpServer;
