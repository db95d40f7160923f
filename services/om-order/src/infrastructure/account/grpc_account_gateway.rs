//! gRPC 账户网关实现

use async_trait::async_trait;
use tonic::transport::Channel;
use tonic::{Code, Request};
use tracing::debug;
use vela_common::AccountId;
use vela_errors::{AppError, AppResult};

use super::account_proto::GetAccountRequest;
use super::account_proto::account_service_client::AccountServiceClient;
use crate::domain::gateway::AccountGateway;

/// 基于 gRPC 的账户网关
///
/// 持有启动时建立的共享通道；生成的客户端按调用克隆，
/// 克隆只复制通道句柄，不建立新连接。
/// 每个请求携带通道配置的截止时间。
pub struct GrpcAccountGateway {
    client: AccountServiceClient<Channel>,
}

impl GrpcAccountGateway {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: AccountServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl AccountGateway for GrpcAccountGateway {
    async fn verify_account(&self, account_id: &AccountId) -> AppResult<bool> {
        let mut client = self.client.clone();

        let request = Request::new(GetAccountRequest {
            id: account_id.to_string(),
        });

        match client.get_account(request).await {
            Ok(_) => Ok(true),
            // NOT_FOUND 是明确结果，不是故障
            Err(status) if status.code() == Code::NotFound => {
                debug!(account_id = %account_id, "Account not found");
                Ok(false)
            }
            Err(status) => Err(AppError::external_service(format!(
                "Account lookup failed: {}",
                status
            ))),
        }
    }
}
