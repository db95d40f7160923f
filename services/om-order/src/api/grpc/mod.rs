//! gRPC 服务端

pub mod order_proto {
    tonic::include_proto!("vela.om.order");

    pub const FILE_DESCRIPTOR_SET: &[u8] =
        include_bytes!(concat!(env!("OUT_DIR"), "/order_descriptor.bin"));
}

pub mod order_service;

pub use order_service::OrderServiceImpl;
