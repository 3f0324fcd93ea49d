pub mod backend;
pub mod factory;
pub mod http;
pub mod prompt;

pub use factory::{build_services, Services};
