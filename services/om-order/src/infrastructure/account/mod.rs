//! 账户服务 gRPC 客户端

pub mod account_proto {
    tonic::include_proto!("vela.am.account");
}

pub mod grpc_account_gateway;

pub use grpc_account_gateway::GrpcAccountGateway;
