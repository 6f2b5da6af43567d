use std::env;
use std::process;

use kansync::cli;

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args).await);
}
