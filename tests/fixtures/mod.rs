//! Shared test fixtures for board integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use choiceboard::board::{Board, BoardServices, BoardSettings};
use choiceboard::models::{Catalog, StudentProfile};
use choiceboard::services::{MockBackend, MockProbe, Prediction};

/// A board plus the mock it talks to, so tests can inspect recorded calls.
pub struct TestBoard {
    /// The board under test
    pub board: Board,
    /// Recorded relay calls
    pub backend: Arc<MockBackend>,
}

/// Builds a board for `student` over the built-in catalog.
///
/// Must be called inside a tokio runtime.
pub fn test_board(student: &str, backend: MockBackend, probe: MockProbe) -> TestBoard {
    test_board_with_catalog(student, backend, probe, Catalog::builtin())
}

/// Builds a board over an explicit catalog.
pub fn test_board_with_catalog(
    student: &str,
    backend: MockBackend,
    probe: MockProbe,
    catalog: Catalog,
) -> TestBoard {
    let backend = Arc::new(backend);
    let board = Board::new(
        tokio::runtime::Handle::current(),
        catalog,
        StudentProfile::new(student),
        BoardServices {
            backend: Arc::clone(&backend) as Arc<dyn choiceboard::services::Backend>,
            probe: Arc::new(probe),
        },
        BoardSettings::default(),
    );
    TestBoard { board, backend }
}

/// Lets every spawned service call finish, then applies the results.
///
/// With a paused clock the 1 ms sleep only completes once all other tasks
/// are idle, so this is deterministic.
pub async fn settle(board: &mut Board) -> usize {
    tokio::time::sleep(Duration::from_millis(1)).await;
    board.pump()
}

/// Taps `item_id` in the open category and settles.
pub async fn tap(board: &mut Board, item_id: &str) {
    let outcome = board.select_sub_item(item_id);
    assert!(outcome.is_accepted(), "tap on {item_id} was {outcome:?}");
    settle(board).await;
}

/// A prediction carrying a generated image.
pub fn generated(label: &str) -> Prediction {
    Prediction {
        label: label.to_string(),
        image_source: Some(format!(
            "https://images.example.com/generated/{}.png",
            label.to_lowercase()
        )),
    }
}

/// Writes a small two-category catalog file and returns its path.
pub fn write_catalog_file(dir: &Path) -> PathBuf {
    let path = dir.join("catalog.toml");
    let content = r#"
[[categories]]
id = "snacks"
label = "Snacks"
color_tag = "food"

[[categories.items]]
id = "crisps"
label = "Crisps"
color_tag = "food"

[[categories.items]]
id = "grapes"
label = "Grapes"
color_tag = "food"
source = { kind = "catalog", asset_id = 1234 }

[[categories]]
id = "outside"
label = "Outside"
color_tag = "play"

[[categories.items]]
id = "swing"
label = "Swing"
color_tag = "play"
"#;
    fs::write(&path, content).expect("Failed to write catalog file");
    path
}
