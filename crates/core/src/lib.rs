pub mod config;
pub mod error;
pub mod service;

pub use config::Config;
pub use error::*;
pub use service::{Service, ServiceMap};
