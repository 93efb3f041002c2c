#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashdrill_backend::run().await
}
