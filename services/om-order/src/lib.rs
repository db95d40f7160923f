//! OM Order Service Library
//!
//! 模块化架构：
//! - `domain`: 订单实体、仓储与账户网关能力接口、编排服务
//! - `infrastructure`: PostgreSQL / 内存仓储实现、gRPC 账户网关
//! - `api`: gRPC 服务端

pub mod api;
pub mod domain;
pub mod error;
pub mod infrastructure;
