#[tokio::main]
async fn main() {
    sachiva::start_server().await;
}
