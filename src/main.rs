use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentence_compare::{
    build_info, core::command, init, render_banner, trigger_embedding, utils::render_results,
    AppError, ComparatorController, Config, ConsoleNotifier, FormCommand, HttpBackend, Reply,
    SimilarityFunction,
};

#[derive(Parser)]
#[command(name = "sentence-compare")]
#[command(about = "Compare sentences with a remote embedding service")]
#[command(version)]
struct Cli {
    /// Base URL of the service (overrides SENTENCE_COMPARE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides SENTENCE_COMPARE_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit the comparator form line by line (default)
    Interactive,
    /// Score texts against a target in one shot
    Compare {
        /// Reference text
        #[arg(short, long)]
        target: String,
        /// Text to compare; repeat for several
        #[arg(short = 'c', long = "text", required = true)]
        texts: Vec<String>,
        /// cosine or euclidean
        #[arg(short, long, default_value = "cosine")]
        function: SimilarityFunction,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Request the embedding of a text and print it
    Embed {
        /// Text to embed
        text: String,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config.validate()?;
    Ok(config)
}

async fn run_interactive(config: &Config) -> Result<()> {
    let backend = HttpBackend::new(config)?;
    let mut controller = ComparatorController::new(backend, ConsoleNotifier);

    println!("{}", render_banner(config));
    println!("{}\n", command::HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", if controller.can_submit() { "ready" } else { "form" });
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match line.parse::<FormCommand>() {
            Ok(cmd) => {
                if let Some(notice) = command::progress_notice(controller.state(), &cmd) {
                    println!("{}", notice);
                }
                command::apply(&mut controller, cmd).await
            }
            Err(e) => Err(e),
        };
        match outcome {
            Ok(Reply::Continue(text)) if !text.is_empty() => println!("{}", text),
            Ok(Reply::Continue(_)) => {}
            Ok(Reply::Quit) => break,
            // submission failures were already shown by the notifier
            Err(e) if e.is_submission_failure() => {}
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}

async fn run_compare(
    config: &Config,
    target: String,
    texts: Vec<String>,
    function: SimilarityFunction,
    json: bool,
) -> Result<()> {
    let backend = HttpBackend::new(config)?;
    let mut controller = ComparatorController::new(backend, ConsoleNotifier);

    controller.update_target(target);
    for (i, text) in texts.into_iter().enumerate() {
        if i > 0 {
            controller.add_compare_field();
        }
        controller.update_compare_at(i, text)?;
    }
    controller.set_function(function);

    let results = match controller.submit().await {
        Ok(results) => results,
        Err(e) if json => {
            println!("{}", serde_json::to_string_pretty(&e.to_json())?);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print!("{}", render_results(results));
    }
    Ok(())
}

async fn run_embed(config: &Config, text: &str) -> Result<()> {
    let backend = HttpBackend::new(config)?;
    let response = trigger_embedding(&backend, &mut ConsoleNotifier, text).await?;
    println!("{}", serde_json::to_string(&response.embedding)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init()?;
    log::debug!("version {}", build_info::long_version());

    let config = load_config(&cli)?;

    let outcome = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(&config).await,
        Commands::Compare {
            target,
            texts,
            function,
            json,
        } => run_compare(&config, target, texts, function, json).await,
        Commands::Embed { text } => run_embed(&config, &text).await,
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // already shown to the user by the notifier
        Err(e) if e.downcast_ref::<AppError>().is_some_and(AppError::is_submission_failure) => {
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}
