//! OrderService gRPC 实现
//!
//! 提供订单创建与查询的 gRPC 接口

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::info;

use vela_bootstrap::metrics::RequestTimer;
use vela_common::AccountId;

use crate::domain::order::{Order, OrderedProduct};
use crate::domain::services::OrderService;

use super::order_proto;

/// OrderService 实现
pub struct OrderServiceImpl {
    order_service: Arc<OrderService>,
}

impl OrderServiceImpl {
    pub fn new(order_service: Arc<OrderService>) -> Self {
        Self { order_service }
    }

    /// 将领域实体转换为 Proto Order
    fn order_to_proto(order: &Order) -> order_proto::Order {
        order_proto::Order {
            id: order.id.to_string(),
            account_id: order.account_id.to_string(),
            created_at: Some(prost_types::Timestamp {
                seconds: order.created_at.timestamp(),
                nanos: order.created_at.timestamp_subsec_nanos() as i32,
            }),
            total_price: order.total_price,
            products: order.products.iter().map(Self::product_to_proto).collect(),
        }
    }

    fn product_to_proto(product: &OrderedProduct) -> order_proto::OrderedProduct {
        order_proto::OrderedProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
        }
    }

    fn product_from_proto(product: order_proto::OrderedProduct) -> OrderedProduct {
        OrderedProduct {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
        }
    }
}

#[tonic::async_trait]
impl order_proto::order_service_server::OrderService for OrderServiceImpl {
    /// 创建订单
    async fn post_order(
        &self,
        request: Request<order_proto::PostOrderRequest>,
    ) -> Result<Response<order_proto::PostOrderResponse>, Status> {
        let timer = RequestTimer::new("OrderService", "PostOrder");
        let req = request.into_inner();
        info!(account_id = %req.account_id, "Posting order");

        let products = req
            .products
            .into_iter()
            .map(Self::product_from_proto)
            .collect();

        match self
            .order_service
            .post_order(AccountId::new(req.account_id), products)
            .await
        {
            Ok(order) => {
                timer.finish("ok");
                Ok(Response::new(order_proto::PostOrderResponse {
                    order: Some(Self::order_to_proto(&order)),
                }))
            }
            Err(e) => {
                timer.finish("error");
                Err(e.into())
            }
        }
    }

    /// 查询账户的全部订单
    async fn get_orders_for_account(
        &self,
        request: Request<order_proto::GetOrdersForAccountRequest>,
    ) -> Result<Response<order_proto::GetOrdersForAccountResponse>, Status> {
        let timer = RequestTimer::new("OrderService", "GetOrdersForAccount");
        let req = request.into_inner();

        match self
            .order_service
            .get_orders_for_account(AccountId::new(req.account_id))
            .await
        {
            Ok(orders) => {
                timer.finish("ok");
                Ok(Response::new(order_proto::GetOrdersForAccountResponse {
                    orders: orders.iter().map(Self::order_to_proto).collect(),
                }))
            }
            Err(e) => {
                timer.finish("error");
                Err(e.into())
            }
        }
    }
}
