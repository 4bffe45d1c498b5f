fn main() -> Result<(), Box<dyn std::error::Error>> {
    // comment-service PROVIDES CommentService; the VideoService client comes from grpc-clients
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(&["../proto/comment.proto"], &["../proto/"])?;

    println!("cargo:rerun-if-changed=../proto/comment.proto");
    Ok(())
}
