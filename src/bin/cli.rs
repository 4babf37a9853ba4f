//! Coding Helper - screenshot a coding question and get a solution
//!
//! This is the CLI entry point for the coding-helper tool.
//! Run with: cargo run --bin coding-helper

use anyhow::{bail, Context};
use coding_helper::config::get_messages;
use coding_helper::{AppSettings, Region, Solver};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const USAGE: &str = "\
Usage: coding-helper [OPTIONS]

Without options an interactive loop starts: press Enter to capture the
screen and analyze it, type 'quit' or 'exit' to leave.

Options:
  --image <PATH>        Analyze an existing image file
  --region <X,Y,W,H>    Capture and analyze a region of the screen
  --full                Capture and analyze the whole screen once
  --language <LANG>     Language for the implementation (default: Python)
  -h, --help            Show this help

Environment:
  OPENAI_API_KEY        API key (required, may live in .env)
  OPENAI_BASE_URL       OpenAI-compatible endpoint
  MODEL_NAME            Vision model, e.g. gpt-4o-mini
";

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Interactive,
    FullScreen,
    Region(Region),
    Image(PathBuf),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    mode: Mode,
    language: Option<String>,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut mode = Mode::Interactive;
    let mut language = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} requires a value", flag))
        };

        let next_mode = match arg.as_str() {
            "-h" | "--help" => Mode::Help,
            "--full" => Mode::FullScreen,
            "--image" => Mode::Image(PathBuf::from(value("--image")?)),
            "--region" => Mode::Region(value("--region")?.parse()?),
            "--language" => {
                language = Some(value("--language")?);
                continue;
            }
            other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
        };

        if mode != Mode::Interactive && mode != next_mode {
            bail!("--image, --region and --full are mutually exclusive");
        }
        mode = next_mode;
    }

    Ok(CliArgs { mode, language })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    if cli.mode == Mode::Help {
        print!("{}", USAGE);
        return Ok(());
    }

    let mut settings = AppSettings::load_with_env();
    if let Some(language) = cli.language {
        settings.solution_language = language;
    }

    if !settings.has_api_key() {
        bail!("OPENAI_API_KEY is not set. Add it to your environment or a .env file");
    }

    let msgs = get_messages(&settings.lang);
    let solver = Solver::from_settings(&settings);

    println!("{}", banner(&settings));

    match cli.mode {
        Mode::Image(path) => {
            println!("{}", msgs.analyzing);
            let answer = solver
                .solve_file(&path)
                .await
                .with_context(|| format!("Failed to analyze {}", path.display()))?;
            println!("\n{}", answer);
        }
        Mode::Region(region) => {
            println!("{}", msgs.capturing);
            let answer = solver.capture_region_and_solve(region).await?;
            println!("\n{}", answer);
        }
        Mode::FullScreen => {
            println!("{}", msgs.capturing);
            let answer = solver.capture_screen_and_solve().await?;
            println!("\n{}", answer);
        }
        Mode::Interactive => run_interactive(&solver, msgs.press_enter_to_capture).await?,
        Mode::Help => {}
    }

    Ok(())
}

fn banner(settings: &AppSettings) -> String {
    let rule = "================================================";
    format!(
        "🧩 Coding Helper\n{rule}\nModel: {} @ {}\nSolution language: {}\nRetry: {} retries ({} attempts), {}s delay\n{rule}\n",
        settings.model_name,
        settings.base_url,
        settings.solution_language,
        settings.max_retries,
        settings.max_retries + 1,
        settings.retry_delay,
    )
}

/// Capture on every Enter until the user quits.
async fn run_interactive(solver: &Solver, hint: &str) -> anyhow::Result<()> {
    println!("Interactive mode. {}\n", hint);

    let stdin = io::stdin();
    loop {
        print!("📸 Ready > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if input == "quit" || input == "exit" {
            println!("Goodbye! 👋");
            break;
        }

        match solver.capture_screen_and_solve().await {
            Ok(answer) => println!("\n{}\n", answer),
            Err(e) => eprintln!("\n❌ Image analysis error: {}\n", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_interactive() {
        let cli = parse_args(&[]).unwrap();
        assert_eq!(cli.mode, Mode::Interactive);
        assert_eq!(cli.language, None);
    }

    #[test]
    fn test_region_and_language() {
        let cli = parse_args(&args(&["--region", "0,0,800,600", "--language", "C++"])).unwrap();
        assert_eq!(cli.mode, Mode::Region(Region::new(0, 0, 800, 600)));
        assert_eq!(cli.language.as_deref(), Some("C++"));
    }

    #[test]
    fn test_image_mode() {
        let cli = parse_args(&args(&["--image", "question.png"])).unwrap();
        assert_eq!(cli.mode, Mode::Image(PathBuf::from("question.png")));
    }

    #[test]
    fn test_banner_counts_initial_attempt() {
        let settings = AppSettings {
            max_retries: 3,
            retry_delay: 2,
            ..AppSettings::default()
        };
        let text = banner(&settings);
        assert!(text.contains("Retry: 3 retries (4 attempts), 2s delay"));
        assert!(text.contains("Solution language: Python"));
    }

    #[test]
    fn test_invalid_args() {
        assert!(parse_args(&args(&["--region"])).is_err());
        assert!(parse_args(&args(&["--region", "1,2"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--full", "--image", "a.png"])).is_err());
    }
}
