//! 订单实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vela_common::{AccountId, OrderId};

/// 订单行项目
///
/// 值类型，不独立持久化。重复的商品 ID 作为独立行项目保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    /// 单价，非负
    pub price: f64,
    /// 数量，必须为正
    pub quantity: u32,
}

impl OrderedProduct {
    /// 行项目小计
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// 订单实体
///
/// 创建后不可变；`total_price` 始终由服务端重算，
/// 不信任调用方传入的任何合计。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub total_price: f64,
    pub products: Vec<OrderedProduct>,
}

impl Order {
    /// 派生新订单：生成 ID、打时间戳、重算合计
    ///
    /// 行项目保持调用方传入的顺序。
    pub fn new(account_id: AccountId, products: Vec<OrderedProduct>) -> Self {
        let total_price = total_price(&products);
        Self {
            id: OrderId::new(),
            account_id,
            created_at: Utc::now(),
            total_price,
            products,
        }
    }

    /// 换用新生成的 ID
    ///
    /// 仅用于存储层 ID 冲突后的内部重试；其余字段不变。
    pub fn regenerate_id(&mut self) {
        self.id = OrderId::new();
    }
}

/// 订单合计 = Σ(单价 × 数量)
pub fn total_price(products: &[OrderedProduct]) -> f64 {
    products.iter().map(|p| p.subtotal()).sum()
}
