//! 内存订单 Repository 实现
//!
//! 参考实现：本地运行与测试使用，与 PostgreSQL 实现遵守同一契约。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vela_common::{AccountId, OrderId};
use vela_errors::{AppError, AppResult};

use crate::domain::order::Order;
use crate::domain::repositories::OrderRepository;

pub struct MemoryOrderRepository {
    // 单把锁覆盖整次写入，读端不会观察到半写订单
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        let mut orders = self.orders.write().await;

        if orders.contains_key(&order.id) {
            return Err(AppError::conflict(format!(
                "order {} already exists",
                order.id
            )));
        }

        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn find_by_account(&self, account_id: &AccountId) -> AppResult<Vec<Order>> {
        let orders = self.orders.read().await;

        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| &o.account_id == account_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(result)
    }
}
