#[tokio::main]
async fn main() {
    tagger_demo::main().await
}
