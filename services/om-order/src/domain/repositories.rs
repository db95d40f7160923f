//! 订单 Repository trait

use async_trait::async_trait;
use vela_common::AccountId;
use vela_errors::AppResult;

use crate::domain::order::Order;

/// 订单存储能力接口
///
/// 后端可替换（PostgreSQL、内存）；实现必须可被多个在途请求并发调用。
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 持久化完整订单
    ///
    /// 必须原子写入：并发读取永远观察不到半写订单。
    /// 同 ID 订单已存在时返回 `AppError::Conflict`，
    /// 其余后端故障返回 `AppError::Database`。
    async fn save(&self, order: &Order) -> AppResult<()>;

    /// 返回账户的全部订单，按创建时间升序
    ///
    /// 账户没有订单时返回空序列而非错误。
    async fn find_by_account(&self, account_id: &AccountId) -> AppResult<Vec<Order>>;
}
