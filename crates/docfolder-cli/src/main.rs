//! `docfolder` binary entrypoint.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = docfolder_cli::run().await;
    process::exit(exit_code);
}
