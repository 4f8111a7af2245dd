#[tokio::main]
async fn main() -> anyhow::Result<()> {
    license_scanner_lib::run().await
}
