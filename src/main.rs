#[tokio::main]
async fn main() -> std::io::Result<()> {
    craft_sim::run_with_config().await
}
