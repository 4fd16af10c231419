mod config;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kindling_tracker::calendar::{month_config, Month, EMOTIONAL_CODES};
use kindling_tracker::path::{FieldPath, FieldValue, LeafKind};
use kindling_tracker::render;
use kindling_tracker::store::SqliteStore;
use kindling_tracker::tracker::Tracker;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "kindling")]
#[command(about = "Quarterly planning, sprint and reporting checklist tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Target {
    /// Team member (defaults to the configured member)
    #[arg(short = 'p', long)]
    member: Option<String>,

    /// Month, e.g. February (defaults to the configured month)
    #[arg(short, long, value_parser = parse_month)]
    month: Option<Month>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show progress for every member and month
    Overview,
    /// Show one member's checklist for a month
    Show {
        #[command(flatten)]
        target: Target,
    },
    /// List notices due on a date
    Alerts {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Flip a checklist item, e.g. sprints.W3-4.qaComplete
    Toggle {
        #[command(flatten)]
        target: Target,
        path: String,
    },
    /// Set a checklist field, e.g. planning.narrativeArc.notes "Launch arc"
    Set {
        #[command(flatten)]
        target: Target,
        path: String,
        value: String,
    },
    /// Select or deselect an emotional code
    Tag {
        #[command(flatten)]
        target: Target,
        code: String,
    },
    /// Show sprint windows and reporting periods
    Calendar {
        #[arg(short, long, value_parser = parse_month)]
        month: Option<Month>,
    },
}

fn parse_month(s: &str) -> Result<Month, String> {
    Month::from_str(s).ok_or_else(|| {
        let names: Vec<_> = Month::ALL.iter().map(Month::as_str).collect();
        format!("unknown month '{}', expected one of {}", s, names.join(", "))
    })
}

/// Parse a command-line value according to the kind of leaf it targets.
fn parse_value(kind: LeafKind, raw: &str) -> Result<FieldValue> {
    let value = match kind {
        LeafKind::Bool => FieldValue::Bool(
            raw.parse()
                .with_context(|| format!("expected true or false, got '{}'", raw))?,
        ),
        LeafKind::Text => FieldValue::Text(raw.to_string()),
        LeafKind::Tags => FieldValue::Tags(
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    };
    Ok(value)
}

/// Initialize tracing on stderr so stdout carries only rendered output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "kindling_tracker=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::load();
    let db_path = config.database_path()?;
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    let mut tracker = Tracker::with_calendar(
        store,
        config.storage_key.clone(),
        Default::default(),
        Month::ALL.to_vec(),
    );

    let resolve = |target: Target| -> (String, Month) {
        (
            target.member.unwrap_or_else(|| config.default_member.clone()),
            target.month.unwrap_or(config.default_month),
        )
    };

    match cli.command.unwrap_or(Commands::Overview) {
        Commands::Overview => {
            print!("{}", render::render_overview(&tracker.overview()));
        }
        Commands::Show { target } => {
            let (member, month) = resolve(target);
            show(&tracker, &member, month)?;
        }
        Commands::Alerts { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let alerts = tracker.due_alerts(&date);
            if alerts.is_empty() {
                println!("Nothing due on {}", date);
            } else {
                print!("{}", render::render_alerts(&alerts));
            }
        }
        Commands::Toggle { target, path } => {
            let (member, month) = resolve(target);
            let path = FieldPath::parse(&path)?;
            tracker.toggle_field(&member, month, &path)?;
            show(&tracker, &member, month)?;
        }
        Commands::Set {
            target,
            path,
            value,
        } => {
            let (member, month) = resolve(target);
            let path = FieldPath::parse(&path)?;
            let value = parse_value(path.kind(), &value)?;
            tracker.set_field(&member, month, &path, value)?;
            show(&tracker, &member, month)?;
        }
        Commands::Tag { target, code } => {
            let (member, month) = resolve(target);
            if !EMOTIONAL_CODES.contains(&code.as_str()) {
                tracing::warn!(
                    "'{}' is not one of the emotional codes: {}",
                    code,
                    EMOTIONAL_CODES.join(", ")
                );
            }
            tracker.toggle_tag(&member, month, &code)?;
            show(&tracker, &member, month)?;
        }
        Commands::Calendar { month } => {
            let months = month.map(|m| vec![m]).unwrap_or_else(|| Month::ALL.to_vec());
            for month in months {
                print!("{}", render::render_calendar(month, &month_config(month)));
            }
        }
    }

    Ok(())
}

fn show(tracker: &Tracker<SqliteStore>, member: &str, month: Month) -> Result<()> {
    let record = tracker
        .record(member, month)
        .ok_or_else(|| anyhow::anyhow!("No checklist for {} in {}", member, month))?;
    print!(
        "{}",
        render::render_checklist(
            member,
            month,
            record,
            &tracker.month_config(month),
            &tracker.progress(member, month),
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_by_kind() {
        assert_eq!(parse_value(LeafKind::Bool, "true").unwrap(), FieldValue::Bool(true));
        assert!(parse_value(LeafKind::Bool, "yes").is_err());
        assert_eq!(
            parse_value(LeafKind::Text, "Launch arc").unwrap(),
            FieldValue::Text("Launch arc".to_string())
        );
        assert_eq!(
            parse_value(LeafKind::Tags, "Power, Order,,").unwrap(),
            FieldValue::Tags(vec!["Power".to_string(), "Order".to_string()])
        );
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("March"), Ok(Month::March));
        assert!(parse_month("April").is_err());
    }
}
