//! 订单编排服务流程测试
//!
//! 用手写测试替身驱动编排服务，覆盖创建流水线的各分支。

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use om_order::domain::gateway::AccountGateway;
use om_order::domain::order::{Order, OrderedProduct};
use om_order::domain::repositories::OrderRepository;
use om_order::domain::services::OrderService;
use om_order::error::OrderError;
use om_order::infrastructure::persistence::MemoryOrderRepository;
use vela_common::AccountId;
use vela_errors::{AppError, AppResult};

// Mocks

struct MockAccountGateway {
    exists: bool,
    unavailable: bool,
    calls: AtomicU32,
}

impl MockAccountGateway {
    fn found() -> Self {
        Self {
            exists: true,
            unavailable: false,
            calls: AtomicU32::new(0),
        }
    }

    fn not_found() -> Self {
        Self {
            exists: false,
            unavailable: false,
            calls: AtomicU32::new(0),
        }
    }

    fn unavailable() -> Self {
        Self {
            exists: false,
            unavailable: true,
            calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountGateway for MockAccountGateway {
    async fn verify_account(&self, _account_id: &AccountId) -> AppResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(AppError::external_service("deadline exceeded"));
        }
        Ok(self.exists)
    }
}

/// 包装内存仓储：统计 save 次数，并可注入 N 次 ID 冲突
struct CountingRepository {
    inner: MemoryOrderRepository,
    saves: AtomicU32,
    conflicts_remaining: AtomicU32,
}

impl CountingRepository {
    fn new(conflicts: u32) -> Self {
        Self {
            inner: MemoryOrderRepository::new(),
            saves: AtomicU32::new(0),
            conflicts_remaining: AtomicU32::new(conflicts),
        }
    }

    fn save_count(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderRepository for CountingRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        self.inner.save(order).await
    }

    async fn find_by_account(&self, account_id: &AccountId) -> AppResult<Vec<Order>> {
        self.inner.find_by_account(account_id).await
    }
}

struct FailingRepository;

#[async_trait]
impl OrderRepository for FailingRepository {
    async fn save(&self, _order: &Order) -> AppResult<()> {
        Err(AppError::database("connection reset"))
    }

    async fn find_by_account(&self, _account_id: &AccountId) -> AppResult<Vec<Order>> {
        Err(AppError::database("connection reset"))
    }
}

fn product(id: &str, price: f64, quantity: u32) -> OrderedProduct {
    OrderedProduct {
        id: id.to_string(),
        name: format!("product-{}", id),
        description: String::new(),
        price,
        quantity,
    }
}

fn service_with(
    gateway: Arc<MockAccountGateway>,
    repository: Arc<dyn OrderRepository>,
) -> OrderService {
    OrderService::new(gateway, repository)
}

#[tokio::test]
async fn test_post_order_computes_total_server_side() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(MemoryOrderRepository::new());
    let service = service_with(gateway.clone(), repo.clone());

    let order = service
        .post_order(
            AccountId::new("acc-1"),
            vec![product("p1", 10.0, 2), product("p2", 5.0, 1)],
        )
        .await
        .unwrap();

    assert_eq!(order.total_price, 25.0);
    assert_eq!(gateway.call_count(), 1);

    // 持久化后的订单携带服务端派生字段
    let found = service
        .get_orders_for_account(AccountId::new("acc-1"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, order.id);
    assert_eq!(found[0].total_price, 25.0);
    assert_eq!(found[0].created_at, order.created_at);
}

#[tokio::test]
async fn test_post_order_unknown_account_is_terminal() {
    let gateway = Arc::new(MockAccountGateway::not_found());
    let repo = Arc::new(CountingRepository::new(0));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new("acc-x"), vec![product("p1", 10.0, 1)])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::AccountNotFound(_)));
    assert_eq!(repo.save_count(), 0);

    // 该账户此后不可见任何订单
    let found = service
        .get_orders_for_account(AccountId::new("acc-x"))
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_post_order_empty_products_skips_remote_call() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(CountingRepository::new(0));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new("acc-1"), vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::InvalidInput(_)));
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn test_post_order_empty_account_id_is_invalid() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(CountingRepository::new(0));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new(""), vec![product("p1", 10.0, 1)])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::InvalidInput(_)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_post_order_zero_quantity_is_invalid() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(CountingRepository::new(0));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new("acc-1"), vec![product("p1", 10.0, 0)])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::InvalidInput(_)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_post_order_negative_price_is_invalid() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(CountingRepository::new(0));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new("acc-1"), vec![product("p1", -1.0, 1)])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::InvalidInput(_)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_post_order_gateway_timeout_skips_storage() {
    let gateway = Arc::new(MockAccountGateway::unavailable());
    let repo = Arc::new(CountingRepository::new(0));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new("acc-1"), vec![product("p1", 10.0, 1)])
        .await
        .unwrap_err();

    // “不可用”不等同于“不存在”
    assert!(matches!(err, OrderError::AccountUnavailable(_)));
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn test_post_order_retries_once_on_id_conflict() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(CountingRepository::new(1));
    let service = service_with(gateway.clone(), repo.clone());

    let order = service
        .post_order(AccountId::new("acc-1"), vec![product("p1", 10.0, 2)])
        .await
        .unwrap();

    assert_eq!(repo.save_count(), 2);

    // 重试后恰好一个订单可见
    let found = service
        .get_orders_for_account(AccountId::new("acc-1"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, order.id);
}

#[tokio::test]
async fn test_post_order_persistent_conflict_surfaces_as_storage() {
    let gateway = Arc::new(MockAccountGateway::found());
    let repo = Arc::new(CountingRepository::new(2));
    let service = service_with(gateway.clone(), repo.clone());

    let err = service
        .post_order(AccountId::new("acc-1"), vec![product("p1", 10.0, 1)])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Storage(_)));
    assert_eq!(repo.save_count(), 2);
}

#[tokio::test]
async fn test_post_order_storage_fault_surfaces_as_storage() {
    let gateway = Arc::new(MockAccountGateway::found());
    let service = service_with(gateway.clone(), Arc::new(FailingRepository));

    let err = service
        .post_order(AccountId::new("acc-1"), vec![product("p1", 10.0, 1)])
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Storage(_)));
}

#[tokio::test]
async fn test_get_orders_empty_account_id_is_invalid() {
    let gateway = Arc::new(MockAccountGateway::found());
    let service = service_with(gateway, Arc::new(MemoryOrderRepository::new()));

    let err = service
        .get_orders_for_account(AccountId::new(""))
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::InvalidInput(_)));
}

#[tokio::test]
async fn test_get_orders_does_not_reverify_account() {
    // 读路径绝不触达账户网关：网关哪怕“不可用”查询也成功
    let gateway = Arc::new(MockAccountGateway::unavailable());
    let repo = Arc::new(MemoryOrderRepository::new());
    let service = service_with(gateway.clone(), repo);

    let found = service
        .get_orders_for_account(AccountId::new("acc-1"))
        .await
        .unwrap();

    assert!(found.is_empty());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_get_orders_propagates_storage_fault() {
    let gateway = Arc::new(MockAccountGateway::found());
    let service = service_with(gateway, Arc::new(FailingRepository));

    let err = service
        .get_orders_for_account(AccountId::new("acc-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Storage(_)));
}
