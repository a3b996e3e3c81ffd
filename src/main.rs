//! lint40 CLI - C style linter
//!
//! Lints C sources against the course style rules and generates
//! documentation skeletons for files, functions and structs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lint40::config::{ColorMode, Config, OutputFormat};
use lint40::document::SourceDocument;
use lint40::edit::unified_diff;
use lint40::engine::{Engine, LintResult};
use lint40::files::collect_files;
use lint40::mode::Mode;
use lint40::output::{formatter_for, OutputFormatter};
use lint40::rule::{builtin_rules, find_rule, Rule};
use lint40::session::Session;
use lint40::template::{self, TemplateKind};
use lint40::watch::{self, WatchEventKind, Watcher};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_CONFIG_FILE: &str = ".lint40.yaml";

#[derive(Parser)]
#[command(
    name = "lint40",
    version,
    about = "C style linter",
    long_about = "Checks C sources for layout, spacing, brace and documentation style, \
                  and generates header, contract and struct documentation skeletons."
)]
struct Cli {
    /// Files, directories or glob patterns to lint (default: current directory)
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule set to run
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Watch files and re-lint on changes
    #[arg(long, short = 'w')]
    watch: bool,

    /// Clear screen before each lint run (use with --watch)
    #[arg(long, requires = "watch")]
    clear: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all rules
    Rules {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show detailed information about a rule
    Explain {
        /// Rule code to explain
        code: String,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Generate documentation skeletons for a file
    Generate {
        /// What to generate
        #[arg(value_enum)]
        kind: KindArg,

        /// File to document
        file: PathBuf,

        /// Rewrite the file in place
        #[arg(long, conflicts_with = "diff")]
        write: bool,

        /// Print a unified diff instead of the document
        #[arg(long)]
        diff: bool,

        /// Date placed in the file header (default: today, MM/DD/YYYY)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Off,
    Draft,
    Review,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Off => Mode::Off,
            ModeArg::Draft => Mode::Draft,
            ModeArg::Review => Mode::Review,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Compact,
    Github,
    Lsp,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Compact => OutputFormat::Compact,
            Format::Github => OutputFormat::Github,
            Format::Lsp => OutputFormat::Lsp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Header,
    Contracts,
    Structs,
}

impl From<KindArg> for TemplateKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Header => TemplateKind::Header,
            KindArg::Contracts => TemplateKind::Contracts,
            KindArg::Structs => TemplateKind::Structs,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Rules { json } => list_rules(*json)?,
            Commands::Explain { code } => {
                let rule = find_rule(code).with_context(|| format!("Unknown rule '{}'", code))?;
                explain_rule(rule);
            }
            Commands::Init { force } => init_config(Path::new(DEFAULT_CONFIG_FILE), *force)?,
            Commands::Generate {
                kind,
                file,
                write,
                diff,
                date,
            } => generate(
                (*kind).into(),
                file,
                *write,
                *diff,
                date.clone().unwrap_or_else(template::today),
            )?,
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    if cli.no_color || config.output.color == ColorMode::Never {
        colored::control::set_override(false);
    } else if config.output.color == ColorMode::Always {
        colored::control::set_override(true);
    }

    let targets = if cli.files.is_empty() {
        vec![".".to_string()]
    } else {
        cli.files.clone()
    };
    let files = collect_files(&targets, &config.files)?;
    if files.is_empty() {
        bail!("No C files found to lint");
    }

    let formatter = formatter_for(
        config.output.format,
        !cli.no_color && config.output.color != ColorMode::Never,
        config.output.statistics,
    );
    let engine = Engine::new(config);

    if cli.watch {
        watch_files(engine, &files, formatter.as_ref(), cli.clear)?;
        return Ok(ExitCode::SUCCESS);
    }

    let mode = engine.config().mode;
    if cli.verbose {
        eprintln!("Linting {} file(s) in {} mode", files.len(), mode);
    }
    let result = engine.lint(&files, mode);
    print!("{}", formatter.format(&result));

    Ok(ExitCode::from(result.exit_code() as u8))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };

    config.merge_cli(
        cli.mode.map(Mode::from),
        cli.format.map(OutputFormat::from),
        cli.jobs,
        cli.disable.clone(),
        cli.select.clone(),
    );
    if cli.verbose {
        config.output.verbose = true;
    }
    Ok(config)
}

fn list_rules(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(builtin_rules())?);
        return Ok(());
    }

    println!("{} ({} rules):", "lint40 rules".bold(), builtin_rules().len());
    for rule in builtin_rules() {
        let tier = match rule.tier {
            Mode::Review => "review".yellow(),
            Mode::Draft => "draft".green(),
            Mode::Off => "always".normal(),
        };
        println!("    {} [{}] ({})", rule.code.cyan(), tier, rule.category);
        println!("      {}", rule.description);
    }
    Ok(())
}

fn explain_rule(rule: &Rule) {
    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "Code".bold(), rule.code.cyan());
    println!("  {}: {}", "Name".bold(), rule.name);
    println!("  {}: {}", "Category".bold(), rule.category);
    println!("  {}: {}", "Mode".bold(), rule.tier);

    println!();
    println!("  {}", "Description".bold());
    println!("  {}", rule.description);

    if !rule.example_bad.is_empty() {
        println!();
        println!("  {} {}", "Example".bold(), "(incorrect)".red());
        for line in rule.example_bad.lines() {
            println!("    {}", line);
        }
    }

    if !rule.example_good.is_empty() {
        println!();
        println!("  {} {}", "Example".bold(), "(correct)".green());
        for line in rule.example_good.lines() {
            println!("    {}", line);
        }
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    let yaml = Config::default().to_yaml()?;
    let content = format!("# lint40 configuration\n# Generated with: lint40 init\n\n{}", yaml);
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Created {}", "success".green().bold(), path.display());
    Ok(())
}

fn generate(kind: TemplateKind, file: &Path, write: bool, diff: bool, date: String) -> Result<()> {
    let mut document = SourceDocument::from_path(file)?;
    let original = document.text().to_string();

    let report = template::generate_into(kind, &mut document, &date);
    eprintln!("{}", report.message());

    if diff {
        print!("{}", unified_diff(file, &original, document.text()));
    } else if write {
        if !report.already_documented() {
            document.save()?;
        }
    } else {
        print!("{}", document.text());
    }
    Ok(())
}

fn watch_files(
    engine: Engine,
    files: &[PathBuf],
    formatter: &dyn OutputFormatter,
    clear: bool,
) -> Result<()> {
    let watcher = Watcher::new(files).context("Failed to start file watcher")?;
    let mut session = Session::new(engine);

    let mut uris = Vec::with_capacity(files.len());
    for file in files {
        let path = file.canonicalize().unwrap_or_else(|_| file.clone());
        let document = SourceDocument::from_path(&path)?;
        uris.push(document.uri());
        session.open(document);
    }

    if clear {
        watch::clear_screen();
    }
    report(&session, &uris, formatter);
    eprintln!(
        "{} Watching for changes in {} mode... (press Ctrl+C to stop)",
        "[watch]".cyan().bold(),
        session.mode()
    );

    loop {
        let Some(events) = watcher.wait()? else {
            continue;
        };

        let mut changed = Vec::new();
        for event in events {
            let uri = event.path.to_string_lossy().into_owned();
            match event.kind {
                WatchEventKind::Modified => match std::fs::read_to_string(&event.path) {
                    Ok(text) => {
                        session.change(&uri, text);
                        changed.push(uri);
                    }
                    Err(e) => log::warn!("Cannot read {}: {}", event.path.display(), e),
                },
                WatchEventKind::Deleted => session.close(&uri),
            }
        }

        if clear {
            watch::clear_screen();
        }
        report(&session, &changed, formatter);
    }
}

fn report(session: &Session, uris: &[String], formatter: &dyn OutputFormatter) {
    let mut result = LintResult::default();
    for uri in uris {
        result.merge(LintResult::for_file(session.sink().get(uri).to_vec()));
    }
    print!("{}", formatter.format(&result));
}
