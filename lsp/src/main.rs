#[tokio::main]
async fn main() {
    tess_lsp::server::run().await;
}
