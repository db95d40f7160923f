//! 订单编排服务

use std::sync::Arc;

use tracing::{debug, warn};
use vela_common::AccountId;

use crate::domain::gateway::AccountGateway;
use crate::domain::order::{Order, OrderedProduct};
use crate::domain::repositories::OrderRepository;
use crate::error::OrderError;

/// 订单编排服务
///
/// 持有共享的账户网关与订单仓储句柄；自身无可变状态，
/// 可被任意多个在途请求并发调用。
pub struct OrderService {
    gateway: Arc<dyn AccountGateway>,
    repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(gateway: Arc<dyn AccountGateway>, repository: Arc<dyn OrderRepository>) -> Self {
        Self {
            gateway,
            repository,
        }
    }

    /// 创建订单
    ///
    /// 线性流水线：校验输入 → 远程校验账户 → 派生订单 → 持久化。
    /// 任一步失败立即以对应错误终止，不产生部分状态。
    ///
    /// 存储报告 ID 冲突时换新 ID 重试一次（冲突不可归咎于调用方）；
    /// 重试后仍失败则作为存储错误上抛。
    ///
    /// 调用方取消发生在持久化成功之后时订单仍视为已提交
    /// （至少一次语义，调用方按订单 ID 去重）。
    pub async fn post_order(
        &self,
        account_id: AccountId,
        products: Vec<OrderedProduct>,
    ) -> Result<Order, OrderError> {
        // 1. 输入校验；违例时不触达远端与存储
        Self::validate_input(&account_id, &products)?;

        // 2. 账户校验；“不可用”与“不存在”区分上抛
        let exists = self
            .gateway
            .verify_account(&account_id)
            .await
            .map_err(|e| {
                OrderError::AccountUnavailable(format!("account verification failed: {}", e))
            })?;

        if !exists {
            return Err(OrderError::AccountNotFound(format!(
                "account {} does not exist",
                account_id
            )));
        }

        // 3. 派生订单：生成 ID、打时间戳、重算合计
        let mut order = Order::new(account_id, products);

        // 4. 持久化；ID 冲突换新 ID 重试一次
        match self.repository.save(&order).await {
            Ok(()) => {}
            Err(e) if e.is_conflict() => {
                warn!(order_id = %order.id, "Order ID collision, retrying with a fresh ID");
                order.regenerate_id();
                self.repository.save(&order).await.map_err(|e| {
                    OrderError::Storage(format!("order persistence failed after retry: {}", e))
                })?;
            }
            Err(e) => {
                return Err(OrderError::Storage(format!(
                    "order persistence failed: {}",
                    e
                )));
            }
        }

        debug!(
            order_id = %order.id,
            account_id = %order.account_id,
            total_price = order.total_price,
            "Order created"
        );

        Ok(order)
    }

    /// 查询账户的全部订单（创建时间升序）
    ///
    /// 不重新校验账户存在性：已删除账户的历史订单仍可读。
    pub async fn get_orders_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Order>, OrderError> {
        if account_id.is_empty() {
            return Err(OrderError::InvalidInput(
                "account id must not be empty".to_string(),
            ));
        }

        self.repository
            .find_by_account(&account_id)
            .await
            .map_err(|e| OrderError::Storage(format!("order lookup failed: {}", e)))
    }

    fn validate_input(
        account_id: &AccountId,
        products: &[OrderedProduct],
    ) -> Result<(), OrderError> {
        if account_id.is_empty() {
            return Err(OrderError::InvalidInput(
                "account id must not be empty".to_string(),
            ));
        }

        if products.is_empty() {
            return Err(OrderError::InvalidInput(
                "order must contain at least one product".to_string(),
            ));
        }

        for product in products {
            if product.quantity == 0 {
                return Err(OrderError::InvalidInput(format!(
                    "product {} has zero quantity",
                    product.id
                )));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(OrderError::InvalidInput(format!(
                    "product {} has an invalid price",
                    product.id
                )));
            }
        }

        Ok(())
    }
}
