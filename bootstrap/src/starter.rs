//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::{error, info};
use vela_config::AppConfig;
use vela_errors::AppResult;

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::metrics::{MetricsRecorder, PoolMetricsCollector};
use crate::runtime::init_runtime;

/// 运行 gRPC 服务
///
/// 这是所有微服务的统一入口点。它负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志、追踪）
/// 3. 创建基础设施资源（数据库、账户服务通道）
/// 4. 启动健康检查 HTTP 服务器
/// 5. 启动连接池 metrics 采集器
/// 6. 调用用户提供的闭包构建并启动 gRPC 服务器
///
/// # 示例
///
/// ```ignore
/// use vela_bootstrap::{run_with_services, shutdown_signal, Infrastructure};
/// use tonic::transport::Server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_with_services("config", |infra: Infrastructure, mut server: Server| async move {
///         let addr = "0.0.0.0:50051".parse().unwrap();
///         server
///             .add_service(build_service(&infra))
///             .serve_with_shutdown(addr, shutdown_signal())
///             .await
///             .map_err(|e| vela_errors::AppError::internal(e.to_string()))?;
///         Ok(())
///     })
///     .await
/// }
/// ```
pub async fn run_with_services<F, Fut>(
    config_dir: &str,
    server_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 初始化 Metrics 记录器
    let metrics = Arc::new(MetricsRecorder::new());

    // 4. 创建基础设施（带重试）
    let infra = Infrastructure::from_config(config.clone()).await?;
    let infra_arc = Arc::new(infra.clone());

    // 5. 创建健康检查器
    let health_checker = Arc::new(HealthChecker::new());

    // 6. 启动连接池 metrics 采集器
    let pool_collector = PoolMetricsCollector::default();
    pool_collector.set_infrastructure(infra_arc.clone()).await;
    let _metrics_handle = pool_collector.start();

    // 7. 健康检查端口为 gRPC 端口 + 1000
    let health_port = config.server.port + 1000;

    // 8. 启动健康检查 HTTP 服务器
    let health_server = HealthServer::new(health_checker.clone(), metrics.clone(), health_port);
    health_server.set_infrastructure(infra.clone()).await;

    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve().await {
            error!("Health server error: {}", e);
        }
    });

    // 9. 构建服务地址
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!(%addr, "gRPC server starting");

    // 10. 让用户构建并启动服务器
    let server = Server::builder();
    server_builder(infra, server).await?;

    // 11. 清理
    health_handle.abort();

    info!("Service stopped");

    Ok(())
}
