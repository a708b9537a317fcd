use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use voxchat::api::ApiServer;
use voxchat::{AiClient, Config, Event, OpenAiClient, Orchestrator, Outcome, SessionState};

/// voxchat - Voice and text chatbot backed by `OpenAI`
#[derive(Parser)]
#[command(name = "voxchat", version, about)]
struct Cli {
    /// Address to bind the chat UI to
    #[arg(long, env = "VOXCHAT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "VOXCHAT_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the browser chat UI (default)
    Serve,
    /// Chat in the terminal; `/audio <file>` submits a recording
    Chat,
    /// Synthesize text to an MP3 file
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
        /// Output file
        #[arg(short, long, default_value = "say.mp3")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,voxchat=info",
        1 => "info,voxchat=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Fails before any UI exists when the credential is missing
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let Config {
        openai_api_key,
        openai,
        mut server,
    } = config;
    if let Some(host) = cli.host {
        server.host = host;
    }
    if let Some(port) = cli.port {
        server.port = port;
    }

    let client = Arc::new(OpenAiClient::new(openai_api_key, &openai)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(
                llm_model = %openai.llm_model,
                tts_voice = %openai.tts_voice,
                scratch_dir = %server.scratch_dir.display(),
                "starting voxchat"
            );
            let orchestrator = Orchestrator::new(client, server.scratch_dir);
            ApiServer::new(orchestrator, server.host, server.port)
                .run()
                .await?;
            Ok(())
        }
        Command::Chat => chat(Orchestrator::new(client, server.scratch_dir)).await,
        Command::Say { text, output } => say(client.as_ref(), &text, &output).await,
    }
}

/// Terminal chat loop over one session
async fn chat(orchestrator: Orchestrator) -> anyhow::Result<()> {
    println!("Type your message, or `/audio <file>` for voice input. Ctrl-D quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = SessionState::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let (event, recording) = match line.strip_prefix("/audio ") {
            Some(path) => {
                let path = PathBuf::from(path.trim());
                match tokio::fs::read(&path).await {
                    Ok(bytes) => (Event::Audio(bytes), Some(path)),
                    Err(e) => {
                        eprintln!("cannot read {}: {e}", path.display());
                        continue;
                    }
                }
            }
            None => (Event::Text(line), None),
        };

        let handled = orchestrator.dispatch(session, event).await;
        session = handled.session;

        match handled.outcome {
            Ok(Outcome::Appended { turns }) => {
                let transcript = session.conversation().turns();
                for turn in &transcript[transcript.len() - turns..] {
                    println!(
                        "[{}] {}: {}",
                        turn.created_at().format("%H:%M:%S"),
                        turn.role().as_str(),
                        turn.content()
                    );
                    if let (Some(clip), Some(recording)) = (turn.audio(), recording.as_ref()) {
                        let reply_path = recording.with_extension("reply.mp3");
                        tokio::fs::write(&reply_path, clip.bytes()).await?;
                        println!("(audio reply saved to {})", reply_path.display());
                    }
                }
            }
            Ok(Outcome::Skipped(reason)) => println!("(skipped: {reason:?})"),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

/// Synthesize text to a file
async fn say(client: &dyn AiClient, text: &str, output: &Path) -> anyhow::Result<()> {
    println!("Synthesizing \"{text}\"...");
    client.synthesize(text, output).await?;
    let bytes = tokio::fs::metadata(output).await?.len();
    println!("Wrote {bytes} bytes to {}", output.display());
    Ok(())
}
