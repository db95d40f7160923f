//! 订单领域层

pub mod gateway;
pub mod order;
pub mod repositories;
pub mod services;

pub use gateway::AccountGateway;
pub use order::{Order, OrderedProduct};
pub use repositories::OrderRepository;
