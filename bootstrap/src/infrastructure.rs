//! 基础设施资源管理
//!
//! 统一管理服务共享的基础设施资源

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tonic::transport::{Channel, Endpoint};
use tracing::info;
use vela_adapter_postgres::{PoolStatus, PostgresConfig, create_pool, pool_status};
use vela_config::{AppConfig, StorageBackend};
use vela_errors::{AppError, AppResult};

use crate::retry::{RetryConfig, with_retry};

/// 基础设施资源容器
///
/// 包含服务共享的基础设施资源，由 bootstrap 统一初始化。
/// 账户服务连接在启动时建立一次，进程生命周期内复用；
/// 容器随进程退出而释放全部连接。
#[derive(Clone)]
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池（内存存储模式下为空）
    postgres_pool: Option<PgPool>,
    /// 账户服务 gRPC 通道
    account_channel: Channel,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        // 1. 创建 PostgreSQL 连接池（内存存储模式下跳过）
        let postgres_pool = match config.storage.backend {
            StorageBackend::Postgres => {
                let pg_config = PostgresConfig::new(config.database.url.expose_secret())
                    .with_max_connections(config.database.max_connections);
                let pool = with_retry(&retry_config, "PostgreSQL connection", || {
                    let cfg = pg_config.clone();
                    async move { create_pool(&cfg).await }
                })
                .await?;
                info!(
                    "PostgreSQL connection pool created (max_connections: {})",
                    config.database.max_connections
                );
                Some(pool)
            }
            StorageBackend::Memory => {
                info!("In-memory storage configured, skipping PostgreSQL");
                None
            }
        };

        // 2. 建立账户服务通道（必需，带重试）
        //
        // 通道在此处建立一次，所有请求共享；每个调用携带
        // request_timeout 截止时间。
        let endpoint = Endpoint::from_shared(config.account.endpoint.clone())
            .map_err(|e| AppError::internal(format!("Invalid account endpoint: {}", e)))?
            .connect_timeout(Duration::from_secs(config.account.connect_timeout_secs))
            .timeout(Duration::from_secs(config.account.request_timeout_secs));

        let account_channel = with_retry(&retry_config, "Account service connection", || {
            let ep = endpoint.clone();
            async move {
                ep.connect().await.map_err(|e| {
                    AppError::external_service(format!("Failed to connect account service: {}", e))
                })
            }
        })
        .await?;
        info!(endpoint = %config.account.endpoint, "Account service channel established");

        Ok(Self {
            config,
            postgres_pool,
            account_channel,
        })
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池（内存存储模式下为 None）
    pub fn postgres_pool(&self) -> Option<PgPool> {
        self.postgres_pool.clone()
    }

    /// 获取账户服务 gRPC 通道
    pub fn account_channel(&self) -> Channel {
        self.account_channel.clone()
    }

    /// 获取服务器配置
    pub fn server_config(&self) -> &vela_config::ServerConfig {
        &self.config.server
    }

    /// 获取 PostgreSQL 连接池状态
    pub fn postgres_pool_status(&self) -> Option<PoolStatus> {
        self.postgres_pool.as_ref().map(pool_status)
    }
}
