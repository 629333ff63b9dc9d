#[tokio::main]
async fn main() -> std::io::Result<()> {
    turn_proxy::run_with_config().await
}
