use serde_json::Value as JsonValue;
use sqlscribe::config::{load_config, Config};
use sqlscribe::{with_connection_config, ColumnarData, FieldInput, InsertData, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "Usage: sqlscribe [--config FILE] <command> <db> [args]

Commands:
  tables <db>                                   list table names
  describe <db> <table>                         list the columns of a table
  create <db> <table> <fields-json>             create a table from field descriptions
  drop <db> <table>                             drop a table (missing tables are ignored)
  insert <db> <table> <fields-json> <rows-json> insert one row or a list of rows
  insert-columns <db> <table> <columns-json>    insert columnar data {field: [values]}";

#[derive(Debug, PartialEq)]
enum Command {
    Tables { db: String },
    Describe { db: String, table: String },
    Create { db: String, table: String, fields: String },
    Drop { db: String, table: String },
    Insert { db: String, table: String, fields: String, rows: String },
    InsertColumns { db: String, table: String, columns: String },
}

impl Command {
    fn db(&self) -> &str {
        match self {
            Command::Tables { db }
            | Command::Describe { db, .. }
            | Command::Create { db, .. }
            | Command::Drop { db, .. }
            | Command::Insert { db, .. }
            | Command::InsertColumns { db, .. } => db,
        }
    }
}

#[derive(Debug, PartialEq)]
struct Invocation {
    config: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> std::result::Result<Invocation, String> {
    let (config, rest) = match args {
        [flag, path, rest @ ..] if flag == "--config" => (Some(PathBuf::from(path)), rest),
        [flag] if flag == "--config" => return Err("--config needs a file path".to_string()),
        _ => (None, args),
    };

    let owned = |s: &String| s.clone();
    let command = match rest {
        [cmd, db] if cmd == "tables" => Command::Tables { db: owned(db) },
        [cmd, db, table] if cmd == "describe" => Command::Describe {
            db: owned(db),
            table: owned(table),
        },
        [cmd, db, table, fields] if cmd == "create" => Command::Create {
            db: owned(db),
            table: owned(table),
            fields: owned(fields),
        },
        [cmd, db, table] if cmd == "drop" => Command::Drop {
            db: owned(db),
            table: owned(table),
        },
        [cmd, db, table, fields, rows] if cmd == "insert" => Command::Insert {
            db: owned(db),
            table: owned(table),
            fields: owned(fields),
            rows: owned(rows),
        },
        [cmd, db, table, columns] if cmd == "insert-columns" => Command::InsertColumns {
            db: owned(db),
            table: owned(table),
            columns: owned(columns),
        },
        [] => return Err("No command given".to_string()),
        [cmd, ..] => return Err(format!("Unknown command or wrong arguments for '{}'", cmd)),
    };

    Ok(Invocation { config, command })
}

fn run(invocation: Invocation) -> Result<()> {
    let config = match &invocation.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let command = invocation.command;
    info!("Opening database: {}", command.db());

    with_connection_config(command.db(), &config.sqlite(), |conn| {
        match &command {
            Command::Tables { .. } => {
                let mut tables = conn.list_tables()?;
                for name in tables.iter()? {
                    println!("{}", name?);
                }
            }
            Command::Describe { table, .. } => {
                let mut columns = conn.describe_table(table)?;
                for column in columns.iter()? {
                    let column = column?;
                    let mut line = format!("{} {}", column.name, column.type_name);
                    if column.notnull {
                        line.push_str(" NOT NULL");
                    }
                    if column.pk > 0 {
                        line.push_str(" PRIMARY KEY");
                    }
                    println!("{}", line);
                }
            }
            Command::Create { table, fields, .. } => {
                let fields = FieldInput::from_json(&serde_json::from_str::<JsonValue>(fields)?)?;
                conn.create_table(table, &fields)?;
                println!("created {}", table);
            }
            Command::Drop { table, .. } => {
                if conn.drop_table(table)? {
                    println!("dropped {}", table);
                } else {
                    println!("{} does not exist", table);
                }
            }
            Command::Insert { table, fields, rows, .. } => {
                let data = InsertData::from_json(
                    &serde_json::from_str::<JsonValue>(fields)?,
                    &serde_json::from_str::<JsonValue>(rows)?,
                )?;
                println!("inserted {} row(s)", conn.insert_rows(table, data)?);
            }
            Command::InsertColumns { table, columns, .. } => {
                let data = ColumnarData::from_json(&serde_json::from_str::<JsonValue>(columns)?)?;
                println!("inserted {} row(s)", conn.insert_rows(table, data)?);
            }
        }
        Ok(())
    })
}

fn main() -> ExitCode {
    // Log to stderr so stdout carries only command output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
