use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;

use presenter_bridge::source::{LevelNotification, LevelSource, StubLevelSource};
use presenter_bridge::transport::{RecordingTransport, Transport};
use presenter_bridge::{BridgeConfig, BridgeHandle, GestureEvent};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("presenter-sim error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "presenter-sim", about = "Replay synthetic button scripts through the bridge")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<()> {
        tracing_subscriber::fmt::init();
        match self.command {
            Command::Replay(args) => replay_command(args),
            Command::ShowConfig(args) => show_config_command(args),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a synthetic press script and print the resulting gestures.
    Replay(ReplayArgs),
    /// Print the effective configuration as JSON.
    ShowConfig(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct ReplayArgs {
    /// Script to replay.
    #[arg(long, value_enum, default_value_t = ScriptArg::Single)]
    script: ScriptArg,
    /// Output format for the gesture log.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[command(flatten)]
    config: ConfigArgs,
    /// Also forward the release command to the transport.
    #[arg(long, default_value_t = false)]
    forward_release: bool,
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Path to a JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> BridgeConfig {
        match &self.config {
            Some(path) => BridgeConfig::load_from_file(path),
            None => BridgeConfig::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum ScriptArg {
    /// One press on the up button.
    Single,
    /// Two presses inside the double-press window.
    Double,
    /// Three rapid presses.
    Triple,
    /// Button held down past the long-press threshold.
    Long,
    /// Button held at the top of the volume range.
    Saturate,
    /// An up press followed by a down press in one burst.
    Reversal,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn replay_command(args: ReplayArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting runtime")?;
    runtime.block_on(replay_impl(args))
}

fn show_config_command(args: ConfigArgs) -> Result<()> {
    let config = args.load();
    let json = serde_json::to_string_pretty(&config).context("serializing configuration")?;
    println!("{json}");
    Ok(())
}

async fn replay_impl(args: ReplayArgs) -> Result<()> {
    let mut config = args.config.load();
    config.bridge.forward_release = args.forward_release;

    let source = Arc::new(StubLevelSource::new(0, 15, 7));
    let transport = Arc::new(RecordingTransport::new());
    let bridge = BridgeHandle::new(
        Arc::clone(&source) as Arc<dyn LevelSource>,
        Arc::clone(&transport) as Arc<dyn Transport>,
        config,
    )
    .context("constructing bridge")?;

    let mut gestures = bridge.subscribe();
    let (tx, rx) = mpsc::channel(64);
    bridge
        .start_monitoring(rx)
        .context("starting monitoring")?;

    run_script(args.script, &source, &tx).await?;

    // Let the last burst settle before tearing down.
    tokio::time::sleep(Duration::from_millis(500)).await;
    bridge.stop_monitoring();

    let mut observed = Vec::new();
    while let Ok(event) = gestures.try_recv() {
        observed.push(event);
    }

    match args.format {
        OutputFormat::Json => print_json(&observed, &transport.sent())?,
        OutputFormat::Table => print_table(&observed, &transport.sent()),
    }
    Ok(())
}

async fn run_script(
    script: ScriptArg,
    source: &StubLevelSource,
    tx: &mpsc::Sender<LevelNotification>,
) -> Result<()> {
    match script {
        ScriptArg::Single => press(source, tx, 1).await?,
        ScriptArg::Double => {
            press(source, tx, 1).await?;
            tokio::time::sleep(Duration::from_millis(150)).await;
            press(source, tx, 1).await?;
        }
        ScriptArg::Triple => {
            for _ in 0..3 {
                press(source, tx, 1).await?;
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
        ScriptArg::Long => {
            press(source, tx, 1).await?;
            // A held button keeps re-notifying; stay inside the release
            // window so the burst never settles early.
            for _ in 0..8 {
                tokio::time::sleep(Duration::from_millis(80)).await;
                press(source, tx, 1).await?;
            }
        }
        ScriptArg::Saturate => {
            source.set_level(15);
            for _ in 0..6 {
                notify(tx).await?;
                tokio::time::sleep(Duration::from_millis(60)).await;
            }
        }
        ScriptArg::Reversal => {
            press(source, tx, 1).await?;
            tokio::time::sleep(Duration::from_millis(120)).await;
            press(source, tx, -1).await?;
        }
    }
    Ok(())
}

async fn press(
    source: &StubLevelSource,
    tx: &mpsc::Sender<LevelNotification>,
    delta: i32,
) -> Result<()> {
    source.step(delta);
    notify(tx).await?;
    notify(tx).await
}

async fn notify(tx: &mpsc::Sender<LevelNotification>) -> Result<()> {
    tx.send(LevelNotification::broadcast())
        .await
        .context("delivering notification")
}

fn print_json(gestures: &[GestureEvent], commands: &[Vec<u8>]) -> Result<()> {
    let payload = serde_json::json!({
        "gestures": gestures,
        "commands": commands,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("serializing gesture log")?
    );
    Ok(())
}

fn print_table(gestures: &[GestureEvent], commands: &[Vec<u8>]) {
    println!("Gestures ({}):", gestures.len());
    for event in gestures {
        println!("  {event:?}");
    }
    println!("Commands sent ({}):", commands.len());
    for command in commands {
        let bytes: Vec<String> = command.iter().map(|b| format!("0x{b:02x}")).collect();
        println!("  [{}]", bytes.join(", "));
    }
}
