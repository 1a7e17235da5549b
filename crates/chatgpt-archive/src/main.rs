// Copyright 2026 chatgpt-archive Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use chatgpt_archive::cli;
use chatgpt_archive::error::ArchiveError;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "chatgpt-archive",
    about = "Save a shared ChatGPT conversation as a static HTML snapshot",
    version
)]
struct Cli {
    /// Share link, e.g. https://chatgpt.com/share/<id>
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chatgpt_archive=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = cli::archive_cmd::run(&cli.url).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        match e.downcast_ref::<ArchiveError>() {
            Some(invalid @ ArchiveError::InvalidUrl(_)) => println!("{invalid}"),
            _ => eprintln!("  Error: {e:#}"),
        }
        std::process::exit(1);
    }

    result
}
