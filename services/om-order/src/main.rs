//! OM Order Service - 订单服务入口
//!
//! 使用 vela-bootstrap 统一启动模式

use std::sync::Arc;

use om_order::api::grpc::OrderServiceImpl;
use om_order::api::grpc::order_proto;
use om_order::api::grpc::order_proto::order_service_server::OrderServiceServer;
use om_order::domain::gateway::AccountGateway;
use om_order::domain::repositories::OrderRepository;
use om_order::domain::services::OrderService;
use om_order::infrastructure::account::GrpcAccountGateway;
use om_order::infrastructure::persistence::{MemoryOrderRepository, PostgresOrderRepository};
use tonic::transport::Server;
use tonic_reflection::server::Builder as ReflectionBuilder;
use vela_bootstrap::{Infrastructure, run_with_services, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_with_services("config", |infra: Infrastructure, mut server: Server| async move {
        let config = infra.config();

        // 组装订单仓储（依赖 OrderRepository trait）
        let repository: Arc<dyn OrderRepository> = match infra.postgres_pool() {
            Some(pool) => {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| {
                        vela_errors::AppError::database(format!("Migration failed: {}", e))
                    })?;
                Arc::new(PostgresOrderRepository::new(pool))
            }
            None => Arc::new(MemoryOrderRepository::new()),
        };

        // 组装账户网关（共享启动时建立的通道）
        let gateway: Arc<dyn AccountGateway> =
            Arc::new(GrpcAccountGateway::new(infra.account_channel()));

        // 组装订单编排服务
        let order_service = Arc::new(OrderService::new(gateway, repository));
        let order_service_impl = OrderServiceImpl::new(order_service);

        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| vela_errors::AppError::internal(format!("Invalid address: {}", e)))?;

        // 构建反射服务
        let reflection_service = ReflectionBuilder::configure()
            .register_encoded_file_descriptor_set(order_proto::FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| {
                vela_errors::AppError::internal(format!(
                    "Failed to build reflection service: {}",
                    e
                ))
            })?;

        server
            .add_service(OrderServiceServer::new(order_service_impl))
            .add_service(reflection_service)
            .serve_with_shutdown(addr, shutdown_signal())
            .await
            .map_err(|e| vela_errors::AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    })
    .await
}
