//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use taxcompanion_core::catalog::{BOOKKEEPING_TOOLS, BUSINESS_TYPES, COUNTRIES, ChoiceOption};
use taxcompanion_core::{Answers, Conversation, export, step_form};
use taxcompanion_shared::{Profile, Step, config_file_path, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Tax Companion — capture your business essentials before filing.
#[derive(Parser)]
#[command(
    name = "taxcompanion",
    version,
    about = "Collect business profile answers and print a pre-filing checklist.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Checklist output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Walk the wizard with the given answers and print the checklist.
    Checklist {
        /// TOML file with answers (flags below override it).
        #[arg(short, long)]
        answers: Option<PathBuf>,

        #[command(flatten)]
        flags: AnswerFlags,

        /// Output format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Include the conversation transcript.
        #[arg(long)]
        transcript: bool,

        /// Write a plain-text export to this file instead of printing.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the form schema of one step (or all steps) as JSON.
    Schema {
        /// Step name, e.g. businessBasics.
        #[arg(long)]
        step: Option<Step>,
    },

    /// List the options accepted by the select fields.
    Options,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Answers given directly on the command line.
#[derive(clap::Args, Default)]
pub(crate) struct AnswerFlags {
    /// Country of tax registration (value or label, see `options`).
    #[arg(long)]
    pub country: Option<String>,

    /// Business structure (value or label).
    #[arg(long)]
    pub business_type: Option<String>,

    /// Approximate annual revenue, free text.
    #[arg(long)]
    pub revenue: Option<String>,

    /// Approximate deductible expenses, free text.
    #[arg(long)]
    pub expenses: Option<String>,

    /// Number of people working in the business.
    #[arg(long)]
    pub employees: Option<String>,

    /// Bookkeeping tool (value or label).
    #[arg(long)]
    pub tool: Option<String>,
}

impl From<AnswerFlags> for Answers {
    fn from(flags: AnswerFlags) -> Self {
        Answers {
            country: flags.country,
            business_type: flags.business_type,
            annual_revenue: flags.revenue,
            annual_expenses: flags.expenses,
            employees: flags.employees,
            bookkeeping_tool: flags.tool,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so checklist
/// output on stdout stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "taxcompanion=warn",
        1 => "taxcompanion=info",
        2 => "taxcompanion=debug",
        _ => "taxcompanion=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Checklist {
            answers,
            flags,
            format,
            transcript,
            out,
        } => cmd_checklist(answers, flags, &format, transcript, out),
        Command::Schema { step } => cmd_schema(step),
        Command::Options => cmd_options(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_checklist(
    answers_path: Option<PathBuf>,
    flags: AnswerFlags,
    format: &OutputFormat,
    transcript: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;

    let base = match &answers_path {
        Some(path) => Answers::load(path)?,
        None => Answers::default(),
    };
    let answers = base.overlay(flags.into());

    info!(
        answers_file = ?answers_path,
        "walking the wizard"
    );
    let conversation = answers.walk()?;
    let transcript = transcript || config.defaults.include_transcript;

    if let Some(path) = out {
        export::write_text(&conversation, transcript, &path)?;
        println!("Checklist written to {}", path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_checklist(&conversation, transcript),
        OutputFormat::Json => {
            let mut doc = serde_json::json!({
                "session": conversation.id(),
                "profile": conversation.profile(),
                "checklist": conversation.summary(),
            });
            if transcript {
                doc["transcript"] = serde_json::to_value(conversation.messages())?;
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn print_checklist(conversation: &Conversation, transcript: bool) {
    println!();
    println!("  {}", conversation.form().prompt);
    println!();
    for line in conversation.summary() {
        println!("  • {line}");
    }
    println!();

    if transcript {
        println!("  Transcript");
        for entry in conversation.messages() {
            println!("    [{:?}] {}", entry.author, entry.text);
        }
        println!();
    }
}

fn cmd_schema(step: Option<Step>) -> Result<()> {
    let profile = Profile::default();
    let forms: Vec<_> = match step {
        Some(step) => vec![step_form(step, &profile)],
        None => Step::ALL.iter().map(|s| step_form(*s, &profile)).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&forms)?);
    Ok(())
}

fn cmd_options() -> Result<()> {
    let groups: [(&str, &str, &[ChoiceOption]); 3] = [
        ("country", "--country", COUNTRIES),
        ("business_type", "--business-type", BUSINESS_TYPES),
        ("bookkeeping_tool", "--tool", BOOKKEEPING_TOOLS),
    ];

    for (key, flag, options) in groups {
        println!("{key} ({flag})");
        for opt in options {
            println!("  {:<12} {}", opt.value, opt.label);
        }
        println!();
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = config_file_path()?;
    if path.exists() {
        return Err(eyre!(
            "config file already exists at {} — remove it first to re-initialize",
            path.display()
        ));
    }

    let created = init_config()?;
    println!("Created {}", created.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_into_answers() {
        let cli = Cli::try_parse_from([
            "taxcompanion",
            "checklist",
            "--country",
            "ng",
            "--business-type",
            "sole",
            "--employees",
            "1",
        ])
        .expect("parse");

        let Command::Checklist { flags, .. } = cli.command else {
            panic!("expected checklist");
        };
        let answers = Answers::from(flags);
        assert_eq!(answers.country.as_deref(), Some("ng"));
        assert_eq!(answers.employees.as_deref(), Some("1"));

        let conv = answers.walk().expect("walk");
        assert!(conv.summary()[1].contains("1 person"));
    }

    #[test]
    fn schema_step_accepts_wire_names() {
        let cli = Cli::try_parse_from(["taxcompanion", "schema", "--step", "financials"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Schema {
                step: Some(Step::Financials)
            }
        ));
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["taxcompanion", "-vv", "options"]).expect("parse");
        assert_eq!(cli.verbose, 2);
    }
}
