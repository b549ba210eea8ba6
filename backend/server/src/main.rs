#[tokio::main]
async fn main() -> anyhow::Result<()> {
    feedback_server::start_server().await
}
