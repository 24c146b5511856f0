use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;

use hayagriva_llm::{
    generate, logging,
    types::Mode,
    ui::{self, ProgressManager},
    Config, GenerateOptions, GenerateReport, Result,
};

#[derive(Parser)]
#[command(name = "hayagriva-llm", author, version, about = "Generate LLM-oriented metadata for a JS/TS package", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write llm.package.json and llm.package.txt in the current directory
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Where the descriptions come from
    #[arg(long, value_enum, default_value_t = ModeArg::Static)]
    mode: ModeArg,

    /// OpenRouter API key (AI mode)
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier, e.g. openai/gpt-4o-mini
    #[arg(long)]
    model: Option<String>,

    /// Chat-completion endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Send the entry file source to the model
    #[arg(long)]
    include_src: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Package root (defaults to the current directory)
    #[arg(long, hide = true)]
    cwd: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Static,
    Ai,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Static => Mode::Static,
            ModeArg::Ai => Mode::Ai,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Generate(args) => run_generate(args).await,
    };

    if let Err(e) = outcome {
        ui::print_error(&e.to_string());
        if e.is_transient() {
            eprintln!("  The failure may be temporary; running the command again can help.");
        }
        process::exit(1);
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    logging::init(logging::level_for(args.verbose));

    let mut config = Config::load()?;
    config.apply_overrides(args.api_key, args.model, args.endpoint);
    config.validate()?;
    debug!("Using model {} at {}", config.llm.model, config.llm.endpoint);

    let cwd = match args.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mode = Mode::from(args.mode);
    let options = GenerateOptions {
        mode,
        settings: config.llm,
        include_src: args.include_src,
    };

    ui::print_banner(mode);
    match mode {
        Mode::Static => ui::print_step("Scanning entry file", None),
        Mode::Ai => ui::print_step("Describing package with", Some(options.settings.model.as_str())),
    }

    let progress = ProgressManager::new();
    let result = generate(&cwd, &options, |event| progress.on_event(&event)).await;
    progress.finish();
    let report = result?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerateReport) {
    ui::print_success(&format!("{} exports described", report.export_count));
    if report.merged {
        ui::print_step("Kept custom keys from the existing llm.package.json", None);
    }
    ui::print_summary(
        &report.json_path,
        &report.txt_path,
        report.json_existed,
        report.txt_existed,
    );
}
