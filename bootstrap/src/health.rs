//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use vela_adapter_postgres::check_connection;

use crate::Infrastructure;
use crate::metrics::MetricsRecorder;

/// 健康检查状态
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// 组件健康状态
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            checks: vec![],
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            checks: vec![],
        }
    }

    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status != "healthy" {
            self.status = "unhealthy".to_string();
        }
        self.checks.push(check);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
            message: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 健康检查器
pub struct HealthChecker {
    infra: Arc<RwLock<Option<Infrastructure>>>,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            infra: Arc::new(RwLock::new(None)),
        }
    }

    /// 设置基础设施引用
    pub async fn set_infrastructure(&self, infra: Infrastructure) {
        let mut guard = self.infra.write().await;
        *guard = Some(infra);
    }

    /// 执行存活检查（liveness）
    ///
    /// 只检查服务是否在运行，不检查依赖
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// 执行就绪检查（readiness）
    ///
    /// 检查所有依赖是否可用
    pub async fn readiness(&self) -> HealthStatus {
        let guard = self.infra.read().await;
        let infra = match guard.as_ref() {
            Some(i) => i,
            None => {
                let mut status = HealthStatus::unhealthy();
                status.add_check(ComponentHealth::unhealthy(
                    "infrastructure",
                    "Not initialized",
                ));
                return status;
            }
        };

        let mut status = HealthStatus::healthy();

        // 检查存储后端
        status.add_check(self.check_storage(infra).await);

        status
    }

    async fn check_storage(&self, infra: &Infrastructure) -> ComponentHealth {
        match infra.postgres_pool() {
            Some(pool) => match check_connection(&pool).await {
                Ok(_) => ComponentHealth::healthy("postgres"),
                Err(e) => ComponentHealth::unhealthy("postgres", e.to_string()),
            },
            // 内存存储没有外部依赖
            None => ComponentHealth::healthy("memory"),
        }
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP 健康检查服务器状态
#[derive(Clone)]
struct HealthServerState {
    checker: Arc<HealthChecker>,
    metrics: Arc<MetricsRecorder>,
}

/// HTTP 健康检查服务器
pub struct HealthServer {
    checker: Arc<HealthChecker>,
    metrics: Arc<MetricsRecorder>,
    port: u16,
}

impl HealthServer {
    /// 创建新的健康检查服务器
    pub fn new(checker: Arc<HealthChecker>, metrics: Arc<MetricsRecorder>, port: u16) -> Self {
        Self {
            checker,
            metrics,
            port,
        }
    }

    /// 设置基础设施引用
    pub async fn set_infrastructure(&self, infra: Infrastructure) {
        self.checker.set_infrastructure(infra).await;
    }

    /// 启动 HTTP 服务器
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let state = HealthServerState {
            checker: self.checker,
            metrics: self.metrics,
        };

        let app = Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "Health check HTTP server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await
    }
}

/// Liveness 端点处理器
async fn health_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    let status = state.checker.liveness().await;
    (StatusCode::OK, Json(status))
}

/// Readiness 端点处理器
async fn ready_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    let status = state.checker.readiness().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// Metrics 端点处理器
async fn metrics_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    let metrics = state.metrics.render();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        metrics,
    )
}
