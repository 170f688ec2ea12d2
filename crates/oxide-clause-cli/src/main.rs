//! oxide-clause CLI
//!
//! Prints the clauses of a SQL statement as JSON.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_clause::{
    FromParser, GroupByParser, JoinParser, Query, SchemaValidator, SelectParser, SubQueryParser,
    TableSchema, ValidationOptions, WhereParser,
};

/// Decompose a SQL statement into its clauses.
#[derive(Parser)]
#[command(name = "oxide-clause")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the JSON output.
    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the statement and print every clause.
    Parse {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Print the FROM tables.
    From {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Print the WHERE predicate and its conditions.
    Where {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Print the JOIN clauses.
    Joins {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Print the GROUP BY columns and HAVING predicate.
    GroupBy {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Print the SELECT items.
    Select {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Print the subqueries and the tables the main query reads.
    Subqueries {
        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },

    /// Validate the statement against a table schema.
    Validate {
        /// JSON table schema file.
        #[arg(short, long, env = "OXIDE_CLAUSE_SCHEMA")]
        schema: PathBuf,

        /// Require every compared value to be a bind placeholder.
        #[arg(long)]
        require_placeholders: bool,

        /// SQL text (read from stdin if omitted).
        sql: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Parse { sql } => {
            let query = Query::parse(&read_sql(sql)?)?;
            print(&query, cli.pretty)?;
        }

        Commands::From { sql } => {
            let parser = FromParser::new(&read_sql(sql)?)?;
            print(parser.tables(), cli.pretty)?;
        }

        Commands::Where { sql } => {
            let parser = WhereParser::new(&read_sql(sql)?)?;
            let output = json!({
                "predicate": parser.predicate(),
                "conditions": parser.conditions(),
            });
            print(&output, cli.pretty)?;
        }

        Commands::Joins { sql } => {
            let parser = JoinParser::new(&read_sql(sql)?)?;
            print(parser.joins(), cli.pretty)?;
        }

        Commands::GroupBy { sql } => {
            let parser = GroupByParser::new(&read_sql(sql)?)?;
            print(&parser.group_by(), cli.pretty)?;
        }

        Commands::Select { sql } => {
            let parser = SelectParser::new(&read_sql(sql)?)?;
            print(parser.items(), cli.pretty)?;
        }

        Commands::Subqueries { sql } => {
            let parser = SubQueryParser::new(&read_sql(sql)?)?;
            print(parser.output(), cli.pretty)?;
        }

        Commands::Validate {
            schema,
            require_placeholders,
            sql,
        } => {
            let text = std::fs::read_to_string(&schema)
                .with_context(|| format!("reading schema {}", schema.display()))?;
            let table = TableSchema::from_json(&text)
                .with_context(|| format!("parsing schema {}", schema.display()))?;
            debug!(table = %table.name, columns = table.columns.len(), "loaded schema");

            let query = Query::parse(&read_sql(sql)?)?;
            SchemaValidator::new(&table)
                .with_options(ValidationOptions {
                    require_placeholders,
                })
                .validate_query(&query)?;

            info!("Statement is valid for table {}.", table.name);
            print(&json!({ "valid": true, "table": table.name }), cli.pretty)?;
        }
    }

    Ok(())
}

/// Returns the SQL argument, or all of stdin when absent.
fn read_sql(sql: Option<String>) -> anyhow::Result<String> {
    if let Some(sql) = sql {
        return Ok(sql);
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("reading SQL from stdin")?;
    Ok(buffer)
}

fn print<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
