#[tokio::main]
async fn main() -> anyhow::Result<()> {
    history_bee_practice::run().await
}
