//! vela-bootstrap - 统一服务启动骨架
//!
//! 所有服务复用的启动逻辑

pub mod health;
pub mod infrastructure;
pub mod metrics;
pub mod retry;
pub mod runtime;
pub mod starter;

pub use infrastructure::Infrastructure;
pub use runtime::{init_runtime, shutdown_signal};
pub use starter::run_with_services;
