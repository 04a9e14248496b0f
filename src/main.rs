use anyhow::Result;
use clap::Parser;

use chatline::cli::commands::{chat, configure, endpoints, send};
use chatline::cli::{Args, Command};
use chatline::config::ResolveOptions;
use chatline::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level)?;

    let resolve = ResolveOptions {
        endpoint: args.endpoint,
        url: args.url,
        ordered: args.ordered,
    };

    match args.command {
        Some(Command::Send { text }) => {
            let code = send::run_send(send::SendOptions { text, resolve }).await?;
            if code != exitcode::OK {
                std::process::exit(code);
            }
        }
        Some(Command::Endpoints { name }) => {
            endpoints::print_endpoints(name.as_deref())?;
        }
        Some(Command::Configure) => {
            configure::run_configure()?;
        }
        None => {
            chat::run_chat(resolve).await?;
        }
    }

    Ok(())
}
