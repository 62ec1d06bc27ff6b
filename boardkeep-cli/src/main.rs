//! boardkeep - command-line interface over the file-backed store
//!
//! Every command prints its JSON result on stdout. Failures print
//! `{"error": "..."}` instead.
//!
//! Exit codes:
//! - 0: Success
//! - 1: The request was rejected (not found, invalid input, conflict)
//! - 2: Internal error (storage, configuration)

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

mod cli;

use boardkeep::activity::ListActivity;
use boardkeep::board::{CreateBoard, DeleteBoard, GetBoard, ListBoards, UpdateBoard};
use boardkeep::column::{AddColumn, DeleteColumn, GetColumn, ListColumns, MoveColumn, UpdateColumn};
use boardkeep::task::{AddTask, DeleteTask, GetTask, ListTasks, MoveTask, UpdateTask};
use boardkeep::{
    BoardContext, BoardkeepConfig, BoardkeepError, BoardkeepProcessor, OperationProcessor,
};
use cli::{ActivityCommand, BoardCommand, Cli, ColumnCommand, Commands, TaskCommand};

const CLIENT_ERROR_EXIT_CODE: i32 = 1;
const INTERNAL_ERROR_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("boardkeep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli).await {
        Ok(value) => {
            print_json(&value);
            0
        }
        Err(e) => {
            tracing::error!("{}", e);
            print_json(&serde_json::json!({ "error": e.to_string() }));
            exit_code_for(&e)
        }
    };
    std::process::exit(exit_code);
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

fn exit_code_for(error: &BoardkeepError) -> i32 {
    if error.is_client_error() || error.status_code() == 409 {
        CLIENT_ERROR_EXIT_CODE
    } else {
        INTERNAL_ERROR_EXIT_CODE
    }
}

async fn run(cli: Cli) -> Result<Value, BoardkeepError> {
    let mut config = BoardkeepConfig::load()?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    let ctx = BoardContext::open(config).await?;
    let processor = match cli.actor {
        Some(actor) => BoardkeepProcessor::with_actor(actor),
        None => BoardkeepProcessor::new(),
    };

    match cli.command {
        Commands::Board(cmd) => board(cmd, &processor, &ctx).await,
        Commands::Column(cmd) => column(cmd, &processor, &ctx).await,
        Commands::Task(cmd) => task(cmd, &processor, &ctx).await,
        Commands::Activity(ActivityCommand::List { limit }) => {
            processor
                .process(&ListActivity { limit }, &ctx)
                .await
        }
    }
}

async fn board(
    cmd: BoardCommand,
    processor: &BoardkeepProcessor,
    ctx: &BoardContext,
) -> Result<Value, BoardkeepError> {
    match cmd {
        BoardCommand::Create { name, description } => {
            processor
                .process(&CreateBoard { name, description }, ctx)
                .await
        }
        BoardCommand::Get { id } => processor.process(&GetBoard::new(id), ctx).await,
        BoardCommand::List => processor.process(&ListBoards, ctx).await,
        BoardCommand::Update {
            id,
            name,
            description,
        } => {
            let op = UpdateBoard {
                id: id.into(),
                name,
                description,
            };
            processor.process(&op, ctx).await
        }
        BoardCommand::Delete { id } => processor.process(&DeleteBoard::new(id), ctx).await,
    }
}

async fn column(
    cmd: ColumnCommand,
    processor: &BoardkeepProcessor,
    ctx: &BoardContext,
) -> Result<Value, BoardkeepError> {
    match cmd {
        ColumnCommand::Add {
            board,
            name,
            color,
            position,
        } => {
            let op = AddColumn {
                board: board.into(),
                name,
                color,
                position,
            };
            processor.process(&op, ctx).await
        }
        ColumnCommand::Get { id } => processor.process(&GetColumn::new(id), ctx).await,
        ColumnCommand::List { board } => processor.process(&ListColumns::new(board), ctx).await,
        ColumnCommand::Update { id, name, color } => {
            let op = UpdateColumn {
                id: id.into(),
                name,
                color,
            };
            processor.process(&op, ctx).await
        }
        ColumnCommand::Delete { id } => processor.process(&DeleteColumn::new(id), ctx).await,
        ColumnCommand::Move {
            id,
            position,
            board,
        } => {
            let op = MoveColumn {
                id: id.into(),
                position,
                board: board.map(Into::into),
            };
            processor.process(&op, ctx).await
        }
    }
}

async fn task(
    cmd: TaskCommand,
    processor: &BoardkeepProcessor,
    ctx: &BoardContext,
) -> Result<Value, BoardkeepError> {
    match cmd {
        TaskCommand::Add {
            column,
            title,
            fields,
            position,
        } => {
            let op = AddTask {
                column: column.into(),
                title,
                description: fields.description,
                priority: fields.priority,
                color: fields.color,
                due_date: fields.due,
                position,
            };
            processor.process(&op, ctx).await
        }
        TaskCommand::Get { id } => processor.process(&GetTask::new(id), ctx).await,
        TaskCommand::List {
            column,
            board,
            priority,
            due_after,
            due_before,
        } => {
            let op = ListTasks {
                column: column.map(Into::into),
                board: board.map(Into::into),
                priority,
                due_after,
                due_before,
            };
            processor.process(&op, ctx).await
        }
        TaskCommand::Update {
            id,
            title,
            fields,
            clear_due,
        } => {
            let op = UpdateTask {
                id: id.into(),
                title,
                description: fields.description,
                priority: fields.priority,
                color: fields.color,
                due_date: fields.due,
                clear_due_date: clear_due,
            };
            processor.process(&op, ctx).await
        }
        TaskCommand::Delete { id } => processor.process(&DeleteTask::new(id), ctx).await,
        TaskCommand::Move {
            id,
            position,
            column,
        } => {
            let op = match column {
                Some(column) => MoveTask::to_column(id, column, position),
                None => MoveTask::new(id, position),
            };
            processor.process(&op, ctx).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardkeep::Priority;

    #[test]
    fn test_cli_parsing_board_create() {
        let cli = Cli::parse_from(["boardkeep", "board", "create", "Roadmap"]);
        assert!(!cli.debug);
        assert!(matches!(
            cli.command,
            Commands::Board(BoardCommand::Create { ref name, description: None }) if name == "Roadmap"
        ));
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "boardkeep", "task", "list", "--column", "c1", "--debug", "--root", "/tmp/x",
            "--actor", "bob",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.actor.as_deref(), Some("bob"));
        assert_eq!(cli.root.unwrap().to_str(), Some("/tmp/x"));
    }

    #[test]
    fn test_cli_parsing_negative_position() {
        let cli = Cli::parse_from(["boardkeep", "task", "move", "t1", "-1", "--column", "c2"]);
        match cli.command {
            Commands::Task(TaskCommand::Move {
                id,
                position,
                column,
            }) => {
                assert_eq!(id, "t1");
                assert_eq!(position, -1);
                assert_eq!(column.as_deref(), Some("c2"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parsing_priority() {
        let cli = Cli::parse_from([
            "boardkeep", "task", "add", "c1", "Ship it", "--priority", "urgent",
        ]);
        match cli.command {
            Commands::Task(TaskCommand::Add { fields, .. }) => {
                assert_eq!(fields.priority, Some(Priority::Urgent));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_task_list_needs_scope() {
        assert!(Cli::try_parse_from(["boardkeep", "task", "list"]).is_err());
        assert!(Cli::try_parse_from(["boardkeep", "task", "list", "--column", "a", "--board", "b"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&BoardkeepError::not_found("task", "t")), 1);
        assert_eq!(exit_code_for(&BoardkeepError::LockBusy), 1);
        assert_eq!(
            exit_code_for(&BoardkeepError::Io(std::io::Error::other("disk full"))),
            2
        );
    }
}
