// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use srtalign::app_config::{self, Config, TranslationProvider};
use srtalign::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn a speech-to-text transcript into a subtitle file
    Segment(SegmentArgs),

    /// Map an existing translation onto the cues of a subtitle file
    Remap(RemapArgs),

    /// Translate a subtitle file or transcript into the target languages
    Translate(TranslateArgs),

    /// Generate shell completions for srtalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct SegmentArgs {
    /// Transcript JSON file
    #[arg(value_name = "TRANSCRIPT")]
    input_path: PathBuf,

    /// Output subtitle file (defaults to the input name with .srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Words and punctuation marks per cue
    #[arg(long)]
    tokens_per_cue: Option<usize>,
}

#[derive(Args, Debug)]
struct RemapArgs {
    /// Source subtitle file (or transcript)
    #[arg(value_name = "SOURCE")]
    source_path: PathBuf,

    /// Plain text file holding the full translation
    #[arg(value_name = "TRANSLATED")]
    translated_path: PathBuf,

    /// Language of the translation
    #[arg(short, long)]
    target_language: String,

    /// Output subtitle file (defaults to subtitles-<lang>.srt next to the source)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input subtitle file or transcript JSON
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Target language codes, repeatable (e.g. -t es -t ru)
    #[arg(short, long = "target-language")]
    target_languages: Vec<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// srtalign - Subtitle translation with timing alignment
///
/// Translates the text of a subtitle file and lays the translation back over
/// the original cue timings.
#[derive(Parser, Debug)]
#[command(name = "srtalign")]
#[command(version)]
#[command(about = "Subtitle translation with timing alignment")]
#[command(long_about = "srtalign translates subtitles and re-times the translation onto the original cues.

EXAMPLES:
    srtalign segment talk.json                          # Transcript to talk.srt
    srtalign remap talk.srt talk.es.txt -t es           # Offline mapping, writes subtitles-es.srt
    srtalign translate talk.srt -t es -t ru             # Translate with the configured provider
    srtalign translate talk.json -p anthropic -t fr -f  # Force overwrite existing outputs
    srtalign completions bash > srtalign.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "srtalign", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    match cli.command {
        Commands::Segment(args) => {
            if let Some(tokens_per_cue) = args.tokens_per_cue {
                config.subtitles.tokens_per_cue = tokens_per_cue;
            }
            config.validate_offline().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.segment_transcript(&args.input_path, args.output)?;
        }
        Commands::Remap(args) => {
            config.target_languages = vec![args.target_language.clone()];
            config.validate_offline().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.remap_file(&args.source_path, &args.translated_path, &args.target_language, args.output)?;
        }
        Commands::Translate(args) => {
            apply_translate_overrides(&mut config, &args);
            config.validate().context("Configuration validation failed")?;
            debug!(
                "Translating from '{}' to [{}] with {}",
                config.source_language,
                config.target_languages.join(", "),
                config.translation.provider.display_name()
            );

            let output_dir = args
                .output_dir
                .clone()
                .unwrap_or_else(|| args.input_path.parent().unwrap_or(Path::new(".")).to_path_buf());

            let controller = Controller::with_config(config)?;
            controller.run(args.input_path, output_dir, args.force_overwrite).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// Override config with CLI options if provided
fn apply_translate_overrides(config: &mut Config, args: &TranslateArgs) {
    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &args.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(source_language) = &args.source_language {
        config.source_language = source_language.clone();
    }

    if !args.target_languages.is_empty() {
        config.target_languages = args.target_languages.clone();
    }
}
