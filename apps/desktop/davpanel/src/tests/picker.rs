use crate::picker::PromptPicker;

use control_core::picker::DirectoryPicker;

use tempfile::TempDir;
use tokio::io::BufReader;

#[tokio::test]
async fn given_existing_directory_entered_when_picking_then_path_returned() {
    // GIVEN: The operator types a real directory
    let dir = TempDir::new().unwrap();
    let input = format!("{}\n", dir.path().display());
    let picker = PromptPicker::new(BufReader::new(input.as_bytes()));

    // WHEN
    let picked = picker.pick_directory("Select Dav directory").await;

    // THEN
    assert_eq!(picked.as_deref(), Some(dir.path()));
}

/// **VALUE**: An empty answer is a cancel, leaving the root as it was.
#[tokio::test]
async fn given_empty_line_when_picking_then_cancelled() {
    let picker = PromptPicker::new(BufReader::new(&b"\n"[..]));

    assert!(picker.pick_directory("Select Dav directory").await.is_none());
}

#[tokio::test]
async fn given_closed_input_when_picking_then_cancelled() {
    let picker = PromptPicker::new(BufReader::new(&b""[..]));

    assert!(picker.pick_directory("Select Dav directory").await.is_none());
}

#[tokio::test]
async fn given_file_instead_of_directory_when_picking_then_cancelled() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "x").unwrap();
    let input = format!("{}\n", file.display());
    let picker = PromptPicker::new(BufReader::new(input.as_bytes()));

    assert!(picker.pick_directory("Select Dav directory").await.is_none());
}
