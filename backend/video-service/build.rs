fn main() -> Result<(), Box<dyn std::error::Error>> {
    // video-service PROVIDES VideoService (server implementation)
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["../proto/video.proto"], &["../proto/"])?;

    println!("cargo:rerun-if-changed=../proto/video.proto");
    Ok(())
}
