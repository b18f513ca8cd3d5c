#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = examflow_api::run().await {
        eprintln!("examflow-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
