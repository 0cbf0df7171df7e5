//! # chatwindow CLI
//!
//! Command-line interface for the chatwindow library.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatwindow::ChatwindowError;
use chatwindow::cli::Args;
use chatwindow::core::tokens::{Cl100kCounter, HeuristicCounter, TokenCounter};
use chatwindow::pipeline::Pipeline;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<(), ChatwindowError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let options = args.window_options()?;

    let input = fs::read(&args.input)?;
    let format = args.resolve_format(&input)?;

    eprintln!("chatwindow v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("  Input:   {}", args.input.display());
    eprintln!("  Format:  {}", format.label());

    let counter: Arc<dyn TokenCounter> = if args.estimate {
        Arc::new(HeuristicCounter)
    } else {
        Arc::new(Cl100kCounter::new()?)
    };
    let pipeline = Pipeline::with_counter(counter).with_encoding(args.encoding);

    if args.overview {
        let summary = pipeline.inspect(&input, format)?;
        let text = if args.json {
            to_json(&summary)?
        } else {
            let span = match (summary.first_timestamp, summary.last_timestamp) {
                (Some(first), Some(last)) => format!("{} .. {}", first, last),
                _ => "-".to_string(),
            };
            format!(
                "Participants: {}\nMessages:     {}\nSpan:         {}\nTokens:       {}\n",
                summary.participants.join(", "),
                summary.message_count,
                span,
                summary.token_count
            )
        };
        return emit(args.output.as_deref(), &text);
    }

    eprintln!("  Budget:  {} tokens", options.token_budget);
    if let Some(start) = options.start_date {
        eprintln!("  Since:   {}", start.format("%Y-%m-%d"));
    }
    if !options.excluded_senders.is_empty() {
        let excluded: Vec<&str> = options.excluded_senders.iter().map(String::as_str).collect();
        eprintln!("  Exclude: {}", excluded.join(", "));
    }

    let result = pipeline.run(&input, format, &options)?;

    if let Some(ref path) = args.codebook {
        fs::write(path, to_json(&result.codebook)?)?;
        eprintln!("  Codebook saved to {}", path.display());
    }

    let text = if args.json {
        to_json(&result)?
    } else {
        result.content.clone()
    };
    emit(args.output.as_deref(), &text)?;

    eprintln!(
        "  Included {} of {} messages ({} parsed), {} tokens in {:.2}s",
        result.messages_included,
        result.messages_filtered,
        result.messages_total,
        result.token_count,
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ChatwindowError> {
    serde_json::to_string_pretty(value)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| ChatwindowError::Io(io::Error::other(e)))
}

fn emit(output: Option<&Path>, text: &str) -> Result<(), ChatwindowError> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("  Output saved to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
