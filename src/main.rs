#[tokio::main]
async fn main() -> std::io::Result<()> {
    event_portal::run().await
}
