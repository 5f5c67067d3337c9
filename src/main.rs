#[tokio::main]
async fn main() {
    let code = offloader::app::startup::startup().await;
    std::process::exit(code);
}
