//! Postia Backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = postia_backend::run().await {
        tracing::error!(error = %e, "server stopped");
        eprintln!("postia-backend: {}", e);
        std::process::exit(1);
    }
}
