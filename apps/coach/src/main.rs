use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_coach::config::{Config, TOKEN_VAR};
use interview_coach::controller::{Advance, SessionController};
use interview_coach::render;
use interview_coach::service::{EnvToken, HttpInterviewService};

const HELP: &str = "\
Commands:
  start <role> [| <stack>]   generate questions and begin an interview
  answer <text>              submit an answer (plain text works too)
  next                       go to the next question, or finish on the last one
  history                    list past interview sessions
  reset                      abandon the current interview
  status                     show where the interview stands
  help                       show this message
  quit                       exit";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Start { role: String, stack: Option<String> },
    Answer(String),
    Next,
    History,
    Reset,
    Status,
    Help,
    Quit,
}

/// Parses one input line. Anything that is not a known command is an answer.
fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" => {
            let (role, stack) = match rest.split_once('|') {
                Some((role, stack)) => (role.trim(), Some(stack.trim().to_string())),
                None => (rest, None),
            };
            Command::Start {
                role: role.to_string(),
                stack: stack.filter(|s| !s.is_empty()),
            }
        }
        "answer" => Command::Answer(rest.to_string()),
        "next" | "finish" => Command::Next,
        "history" => Command::History,
        "reset" => Command::Reset,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Answer(line.to_string()),
    };
    Some(command)
}

async fn show_question(controller: &SessionController) {
    if let Some(text) = render::question(&controller.view().await) {
        println!("{text}");
    }
}

async fn handle(controller: &SessionController, command: Command) {
    match command {
        Command::Start { role, stack } => {
            println!("Generating questions...");
            match controller.start(&role, stack.as_deref()).await {
                Ok(()) => show_question(controller).await,
                Err(err) => println!("Error: {err}"),
            }
        }
        Command::Answer(text) => match controller.submit_answer(text).await {
            Ok(feedback) => {
                println!("{}", render::feedback(&feedback));
                println!("Type `next` for: {}", controller.view().await.advance_label());
            }
            Err(err) => println!("Error: {err}"),
        },
        Command::Next => match controller.advance().await {
            Ok(Advance::Next { .. }) => show_question(controller).await,
            Ok(Advance::Finished { completed }) => {
                println!("Interview finished.");
                if !completed {
                    if let Some(err) = controller.view().await.error {
                        println!("Error: {err}");
                    }
                }
                if let Err(err) = controller.refresh_history().await {
                    warn!("History refresh after finishing failed: {err}");
                }
            }
            Err(err) => println!("Error: {err}"),
        },
        Command::History => match controller.refresh_history().await {
            Ok(()) => println!("{}", render::history(&controller.view().await.history)),
            Err(err) => println!("Error: {err}"),
        },
        Command::Reset => {
            controller.reset().await;
            println!("Interview reset.");
        }
        Command::Status => {
            let view = controller.view().await;
            println!("{}", render::status(&view));
            if let Some(err) = view.error {
                println!("Last error: {err}");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the prompt.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("interview_coach={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Interview Coach v{}", env!("CARGO_PKG_VERSION"));
    info!("Interview Service at {}", config.api_url);

    let service = HttpInterviewService::new(
        config.api_url.clone(),
        config.request_timeout,
        Arc::new(EnvToken::new(TOKEN_VAR)),
    )?;
    let controller = SessionController::new(Arc::new(service));

    if let Err(err) = controller.refresh_history().await {
        warn!("Initial history load failed: {err}");
    }

    println!("AI Interview Coach\n{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            None => continue,
            Some(Command::Quit) => break,
            Some(command) => handle(&controller, command).await,
        }
    }

    info!("Goodbye");
    Ok(())
}
