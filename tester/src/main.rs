use clap::Parser;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value_t = 4000)]
    port: u16,

    #[arg(long, default_value = "John Doe")]
    name: String,

    #[arg(long, default_value = "john@example.com")]
    email: String,

    #[arg(long, default_value = "Hello from the tester!")]
    message: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let response = reqwest::Client::new()
        .post(format!("http://localhost:{}/contact", args.port))
        .json(&json!({
            "name": args.name,
            "email": args.email,
            "message": args.message,
        }))
        .send()
        .await
        .unwrap();

    println!("Status: {}", response.status());
    println!("{}", response.text().await.unwrap());
}
