//! Studio Backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = studio_backend::run().await {
        eprintln!("server error: {}", e);
        std::process::exit(1);
    }
}
