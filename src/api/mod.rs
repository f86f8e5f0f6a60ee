pub mod handlers;
pub mod server;

pub use handlers::{router, ApiState};
pub use server::run_healthcheck;
