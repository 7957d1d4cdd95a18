use clap::{Parser, Subcommand};
use datachat_agents::config::AppConfig;
use datachat_agents::export::transcript_to_markdown;
use datachat_agents::factory::{create_analyst, create_llm_client, open_session};
use datachat_agents::{DataAnalyst, Session, Turn, TurnState, QUICK_QUESTIONS};
use datachat_tools::sqlite_reader::formatter::format_table;
use datachat_tools::SchemaIntrospector;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DISPLAY_ROWS: usize = 20;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask questions about a SQLite database in plain language", long_about = None)]
struct Args {
    /// Path to config file (defaults to <config dir>/datachat/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database to query, overrides the configured path
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one question
    Ask { question: String },
    /// Interactive session; /reset, /schema and /quit are available
    Chat,
    /// Answer a question left unanswered by an interrupted run
    Resume,
    /// Print the transcript
    History,
    /// Clear the transcript
    Reset,
    /// Print tables and columns
    Schema,
    /// Print row counts per table
    Summary,
    /// List starter questions, or ask one by number
    Quick { index: Option<usize> },
    /// Write the transcript as markdown
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(env_filter(std::env::var("RUST_LOG").ok()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(db_path) = args.db_path {
        config.database.path = db_path;
    }

    let mut session = open_session(&config).await?;

    match args.command {
        Command::Ask { question } => {
            let analyst = build_analyst(&config)?;
            recover(&analyst, &mut session).await;
            ask(&analyst, &mut session, &question).await?;
        }
        Command::Chat => {
            let analyst = build_analyst(&config)?;
            recover(&analyst, &mut session).await;
            chat(&analyst, &mut session).await?;
        }
        Command::Resume => {
            let analyst = build_analyst(&config)?;
            if !recover(&analyst, &mut session).await {
                println!("Nothing to resume.");
            }
        }
        Command::History => {
            if session.turns().is_empty() {
                println!("No conversation yet.");
            }
            print_turns(session.turns());
            if let Some(state) = session.context().current_state() {
                println!("\n[latest turn: {}]", state);
            }
        }
        Command::Reset => {
            session.reset().await?;
            println!("Conversation cleared.");
        }
        Command::Schema => {
            println!("{}", SchemaIntrospector::schema_text(&config.database.path));
        }
        Command::Summary => {
            for (table, count) in SchemaIntrospector::table_row_counts(&config.database.path)? {
                println!("{:<24} {:>10}", table, count);
            }
        }
        Command::Quick { index: None } => {
            for (i, quick) in QUICK_QUESTIONS.iter().enumerate() {
                println!("{}. {:<16} {}", i + 1, quick.label, quick.question);
            }
        }
        Command::Quick { index: Some(index) } => {
            let quick = index
                .checked_sub(1)
                .and_then(|i| QUICK_QUESTIONS.get(i))
                .ok_or_else(|| {
                    anyhow::anyhow!("No quick question {}, pick 1-{}", index, QUICK_QUESTIONS.len())
                })?;
            let analyst = build_analyst(&config)?;
            recover(&analyst, &mut session).await;
            ask(&analyst, &mut session, quick.question).await?;
        }
        Command::Export { output } => {
            tokio::fs::write(&output, transcript_to_markdown(session.turns())).await?;
            println!("Transcript written to {}", output.display());
        }
    }

    Ok(())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise
fn env_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn build_analyst(config: &AppConfig) -> anyhow::Result<DataAnalyst> {
    let client = create_llm_client(config)?;
    Ok(create_analyst(config, client))
}

/// Re-run a question an earlier run recorded but never answered.
/// Returns whether anything was run.
async fn recover(analyst: &DataAnalyst, session: &mut Session) -> bool {
    let start = session.turns().len().saturating_sub(1);
    match analyst.resume(session).await {
        Some(state) => {
            println!("Resuming unanswered question:");
            print_turns(&session.turns()[start..]);
            report_state(state);
            println!();
            true
        }
        None => false,
    }
}

async fn ask(analyst: &DataAnalyst, session: &mut Session, question: &str) -> anyhow::Result<()> {
    let start = session.turns().len();
    let state = analyst.ask(session, question).await?;
    print_turns(&session.turns()[start + 1..]);
    report_state(state);
    Ok(())
}

async fn chat(analyst: &DataAnalyst, session: &mut Session) -> anyhow::Result<()> {
    println!("Ask about {} (/schema, /reset, /quit)", analyst.db_path().display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset().await?;
                println!("Conversation cleared.");
            }
            "/schema" => {
                println!("{}", SchemaIntrospector::schema_text(analyst.db_path()));
            }
            question => {
                ask(analyst, session, question).await?;
            }
        }
        println!();
    }

    Ok(())
}

fn report_state(state: TurnState) {
    if !state.is_terminal() {
        println!("[turn {}]", state);
    }
}

fn print_turns(turns: &[Turn]) {
    let mut last_columns: &[String] = &[];

    for turn in turns {
        match turn {
            Turn::User(text) => println!("\n> {}", text),
            Turn::GeneratedSql(sql) => println!("SQL: {}\n", sql),
            Turn::Result { rows, columns } => {
                last_columns = columns;
                if rows.is_empty() {
                    println!("No data found for this question.");
                } else {
                    println!("{}", format_table(columns, rows, DISPLAY_ROWS));
                }
            }
            Turn::Error(message) => println!("Error: {}", message),
            Turn::Insight(text) => println!("Insight: {}", text),
            Turn::ChartSpec(viz) => {
                if let Some((x, y)) = viz.resolve_columns(last_columns) {
                    println!("Chart: {} (x: {}, y: {})", viz.chart_type, x, y);
                }
            }
        }
    }
}
