#[tokio::main]
async fn main() -> eyre::Result<()> {
    loanline::run().await
}
