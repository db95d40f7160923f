//! 账户网关能力接口

use async_trait::async_trait;
use vela_common::AccountId;
use vela_errors::AppResult;

/// 远程账户查询的能力接口
///
/// 底层连接由网关持有：启动时建立一次，进程退出时释放，
/// 不做每调用建连。
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// 校验账户是否存在
    ///
    /// - `Ok(true)`：远端存在匹配账户
    /// - `Ok(false)`：远端明确报告“不存在”
    /// - `Err(AppError::ExternalService)`：超时、传输或协议故障
    ///
    /// “不存在”与“故障”是两种结果，不可混同。
    async fn verify_account(&self, account_id: &AccountId) -> AppResult<bool>;
}
