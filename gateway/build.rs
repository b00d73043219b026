use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    // 编译 product.proto（服务端代码仅供集成测试中的本地桩服务使用）
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .out_dir(&out_dir)
        .compile_protos(&["../proto/catalog/v1/product.proto"], &["../proto"])?;

    println!("cargo:rerun-if-changed=../proto/catalog/v1/product.proto");

    Ok(())
}
