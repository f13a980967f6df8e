#[tokio::main]
async fn main() -> anyhow::Result<()> {
    github_file_manager::run().await
}
