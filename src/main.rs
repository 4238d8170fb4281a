#[tokio::main]
async fn main() {
    if let Err(e) = comp_tracker_lib::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
