#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = accinex_rust::run().await {
        eprintln!("accinex-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
