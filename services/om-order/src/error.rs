//! 服务错误定义

use thiserror::Error;
use vela_errors::AppError;

/// 订单工作流错误
///
/// 五类结果互不混同：输入违例、账户不存在、账户服务不可用、
/// 存储 ID 冲突、其他存储故障。
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account service unavailable: {0}")]
    AccountUnavailable(String),

    #[error("Order conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidInput(msg) => AppError::validation(msg),
            OrderError::AccountNotFound(msg) => AppError::not_found(msg),
            OrderError::AccountUnavailable(msg) => AppError::external_service(msg),
            OrderError::Conflict(msg) => AppError::conflict(msg),
            OrderError::Storage(msg) => AppError::database(msg),
        }
    }
}

impl From<OrderError> for tonic::Status {
    fn from(err: OrderError) -> Self {
        AppError::from(err).into()
    }
}
