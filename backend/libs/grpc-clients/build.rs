fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Client stubs for the services other services call into.
    // video-service builds its own server stubs from the same file.
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(&["../../proto/video.proto"], &["../../proto/"])?;

    println!("cargo:rerun-if-changed=../../proto/video.proto");
    Ok(())
}
