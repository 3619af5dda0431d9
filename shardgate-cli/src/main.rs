use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "shardgate", version, about = "Batched front doors for a single GraphQL backend")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Build { build, out, output } => {
            cmd::build::build_cmd(&build, out.as_deref(), output).await
        }
        Command::Batches { build, output } => cmd::batches::batches_cmd(&build, output).await,
        Command::Decode { payload, output } => cmd::decode::decode_cmd(&payload, output).await,
        Command::Serve {
            payload,
            serve,
            output,
        } => cmd::serve::serve_cmd(&payload, &serve, output).await,
    }
}
