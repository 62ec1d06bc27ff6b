//! Several independently opened contexts on one data directory, the way
//! concurrent CLI invocations share it

use boardkeep::{
    board::{CreateBoard, GetBoard},
    task::{AddTask, MoveTask},
    BoardContext, BoardkeepConfig, Execute,
};
use serde_json::Value;
use tempfile::TempDir;

const TASKS: usize = 6;
const ROUNDS: usize = 12;

fn config(temp: &TempDir) -> BoardkeepConfig {
    BoardkeepConfig {
        lock_timeout_ms: 30_000,
        ..BoardkeepConfig::default().with_root(temp.path().join(".boardkeep"))
    }
}

/// Task positions per column, asserting each column holds 0..n
fn positions(board: &Value) -> Vec<Vec<u64>> {
    board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|column| {
            let positions: Vec<u64> = column["tasks"]
                .as_array()
                .unwrap()
                .iter()
                .map(|t| t["position"].as_u64().unwrap())
                .collect();
            let expected: Vec<u64> = (0..positions.len() as u64).collect();
            assert_eq!(positions, expected, "non-contiguous column: {}", column);
            positions
        })
        .collect()
}

/// Open a fresh context, as a new CLI process would, and run one move
async fn move_with_own_context(
    config: BoardkeepConfig,
    id: String,
    column: Option<String>,
    position: i64,
) -> boardkeep::Result<Value> {
    let ctx = BoardContext::open(config).await?;
    let command = match column {
        Some(column) => MoveTask::to_column(id.as_str(), column.as_str(), position),
        None => MoveTask::new(id.as_str(), position),
    };
    command.execute(&ctx).await.into_result()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_moves_from_separate_contexts_keep_positions_contiguous() {
    let temp = TempDir::new().unwrap();
    let setup = BoardContext::open(config(&temp)).await.unwrap();
    let board = CreateBoard::new("Shared")
        .execute(&setup)
        .await
        .into_result()
        .unwrap();
    let board_id = board["id"].as_str().unwrap().to_string();
    let todo = board["columns"][0]["id"].as_str().unwrap().to_string();
    let done = board["columns"][2]["id"].as_str().unwrap().to_string();

    let mut ids = Vec::new();
    for i in 0..TASKS {
        let task = AddTask::new(todo.as_str(), format!("task {}", i))
            .execute(&setup)
            .await
            .into_result()
            .unwrap();
        ids.push(task["id"].as_str().unwrap().to_string());
    }
    drop(setup);

    for round in 0..ROUNDS {
        let mut handles = Vec::new();
        for (k, id) in ids.iter().enumerate() {
            let config = config(&temp);
            let id = id.clone();
            let position = ((k + round) % TASKS) as i64;
            // Every third round also shuttles tasks between two columns
            let column = match (round % 3, k % 2) {
                (2, 0) => Some(done.clone()),
                (2, _) => Some(todo.clone()),
                _ => None,
            };
            handles.push(tokio::spawn(move_with_own_context(config, id, column, position)));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reader = BoardContext::open(config(&temp)).await.unwrap();
        let board = GetBoard::new(board_id.as_str())
            .execute(&reader)
            .await
            .into_result()
            .unwrap();
        let columns = positions(&board);
        let total: usize = columns.iter().map(Vec::len).sum();
        assert_eq!(total, TASKS, "round {} lost or duplicated tasks", round);
    }
}
