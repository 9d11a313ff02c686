pub mod backend_client;
pub mod handlers;
pub mod messages;
pub mod routes;
pub mod server;

pub use backend_client::{BackendClient, BackendError};
pub use server::UiServer;
