fn main() {
    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());

    // 编译 order.proto（服务端）
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .file_descriptor_set_path(out_dir.join("order_descriptor.bin"))
        .compile_protos(&["../../proto/om/v1/order.proto"], &["../../proto"])
        .expect("Failed to compile order.proto");

    // 编译 account.proto（客户端）
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(&["../../proto/am/v1/account.proto"], &["../../proto"])
        .expect("Failed to compile account.proto");

    println!("cargo:rerun-if-changed=../../proto/om/v1/order.proto");
    println!("cargo:rerun-if-changed=../../proto/am/v1/account.proto");
}
