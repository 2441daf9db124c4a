//! Compiles the wire schema with protox, a pure-Rust protobuf compiler,
//! so building the workspace does not require a protoc binary.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let file_descriptors = protox::compile(
        [
            "proto/orchestrator.proto",
            "proto/tool_event.proto",
            "proto/report.proto",
        ],
        ["proto"],
    )?;

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_fds(file_descriptors)?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
