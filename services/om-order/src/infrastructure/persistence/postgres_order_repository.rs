//! PostgreSQL 订单 Repository 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;
use vela_bootstrap::metrics::DbQueryTimer;
use vela_common::{AccountId, OrderId};
use vela_errors::{AppError, AppResult};

use crate::domain::order::{Order, OrderedProduct};
use crate::domain::repositories::OrderRepository;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        let timer = DbQueryTimer::new("insert", "orders");

        // 行项目作为 JSONB 随订单单行写入，半写订单不可观察
        let result = sqlx::query(
            r#"
            INSERT INTO orders (id, account_id, created_at, total_price, products)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.0)
        .bind(order.account_id.as_str())
        .bind(order.created_at)
        .bind(order.total_price)
        .bind(Json(&order.products))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                timer.finish(true);
                Ok(())
            }
            Err(e) => {
                timer.finish(false);
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return Err(AppError::conflict(format!(
                            "order {} already exists",
                            order.id
                        )));
                    }
                }
                Err(AppError::database(format!("Failed to save order: {}", e)))
            }
        }
    }

    async fn find_by_account(&self, account_id: &AccountId) -> AppResult<Vec<Order>> {
        let timer = DbQueryTimer::new("select", "orders");

        let result = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, account_id, created_at, total_price, products
            FROM orders
            WHERE account_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(account_id.as_str())
        .fetch_all(&self.pool)
        .await;

        match result {
            Ok(rows) => {
                timer.finish(true);
                Ok(rows.into_iter().map(OrderRow::into_order).collect())
            }
            Err(e) => {
                timer.finish(false);
                Err(AppError::database(format!("Failed to find orders: {}", e)))
            }
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    account_id: String,
    created_at: DateTime<Utc>,
    total_price: f64,
    products: Json<Vec<OrderedProduct>>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: OrderId::from_uuid(self.id),
            account_id: AccountId::new(self.account_id),
            created_at: self.created_at,
            total_price: self.total_price,
            products: self.products.0,
        }
    }
}
