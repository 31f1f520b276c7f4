#[tokio::main]
async fn main() {
    if let Err(e) = btc_query::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
