//! Binary entry point for the Skirmish match server.

#[tokio::main]
async fn main() {
    if let Err(e) = lib_skirmish::init().await {
        eprintln!("❌ Fatal error: {e}");
        std::process::exit(1);
    }
}
