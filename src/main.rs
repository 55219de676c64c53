use anyhow::Context;
use camkit::replay::{self, Script};
use camkit::{init_logging, EditorConfig, BUILD_DATE, VERSION};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "camkit")]
#[command(version, about = "Interactive 2D geometry and drill editing engine")]
struct Cli {
    /// Log as JSON lines instead of pretty text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a JSON event script to an editor session
    Replay {
        /// Script to replay
        script: PathBuf,

        /// Editor config (TOML or JSON); defaults to the user config file
        #[arg(long, short = 'c', value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the resulting object here instead of stdout
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print version and build date
    Info,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::load_from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match EditorConfig::default_path() {
            Some(path) => EditorConfig::load_or_default(&path)?,
            None => EditorConfig::default(),
        },
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Info => {
            println!("camkit {} (built {})", VERSION, BUILD_DATE);
        }
        Command::Replay {
            script,
            config,
            output,
        } => {
            let config = load_config(config)?;
            let script = Script::from_file(&script)?;
            let report = replay::run(&script, config).await?;

            for message in &report.messages {
                eprintln!("{}", message);
            }
            let object = serde_json::to_string_pretty(&report.object)?;
            match output {
                Some(path) => std::fs::write(&path, object)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", object),
            }
        }
    }
    Ok(())
}
