// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use procview::config::CONFIG;
use procview::console::{
    spawn_command, ConsolePipeline, SinkDispatcher, TerminalSink, LINE_TERMINATOR,
};

#[derive(Parser, Debug)]
#[command(
    name = "procview",
    about = "Run a command and stream its live output through a batching console pipeline"
)]
struct Cli {
    /// Program to run
    program: String,

    /// Arguments passed to the program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    info!(program = %cli.program, "launching child process");

    let (process, stdout, stderr) = spawn_command(&cli.program, &cli.args)?;
    let kill_switch = process.kill_switch();

    let (sink, dispatcher) = SinkDispatcher::spawn(Box::new(TerminalSink::new()));
    sink.append_batch(format!("Launching {}...{}", cli.program, LINE_TERMINATOR));

    let pipeline = ConsolePipeline::launch(stdout, stderr, Box::new(process), sink.clone(), &CONFIG);

    // Ctrl-C is the terminal stand-in for a kill button.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, killing child process");
            kill_switch.cancel();
        }
    });

    pipeline.join().await;

    // Let the dispatcher drain any remaining display updates.
    drop(sink);
    let _ = dispatcher.await;

    Ok(())
}
