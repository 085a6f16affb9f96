//! Headless rendering of the visualizer into text frames, for demos and documentation.

use crate::app::App;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const FRAME_WIDTH: u16 = 100;
const FRAME_HEIGHT: u16 = 30;
/// Number of single-step frames captured after the initial one.
const STEP_FRAMES: usize = 4;
/// The final frame is captured once the machine halts or reaches this many steps.
const FINAL_STEP_LIMIT: usize = 20;

/// Renders the initial configuration, the first few steps, and the final configuration
/// into `dir`, returning the paths written.
pub fn write_snapshots(app: &mut App, dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut terminal = Terminal::new(TestBackend::new(FRAME_WIDTH, FRAME_HEIGHT))?;
    let mut written = Vec::new();

    written.push(capture(&mut terminal, app, dir, "initial")?);

    for i in 1..=STEP_FRAMES {
        app.step_machine();
        written.push(capture(&mut terminal, app, dir, &format!("step{i}"))?);
    }

    while !app.machine().is_halted() && app.machine().step_count() < FINAL_STEP_LIMIT {
        app.step_machine();
    }
    written.push(capture(&mut terminal, app, dir, "final")?);

    Ok(written)
}

fn capture(
    terminal: &mut Terminal<TestBackend>,
    app: &App,
    dir: &Path,
    name: &str,
) -> io::Result<PathBuf> {
    terminal.draw(|f| app.render(f))?;

    let path = dir.join(format!("{name}.txt"));
    fs::write(&path, buffer_text(terminal.backend().buffer()))?;
    Ok(path)
}

fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;

    buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_snapshots() {
        let dir = tempdir().unwrap();
        let mut app = App::new_default().unwrap();

        let paths = write_snapshots(&mut app, dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "initial.txt",
                "step1.txt",
                "step2.txt",
                "step3.txt",
                "step4.txt",
                "final.txt"
            ]
        );

        let initial = fs::read_to_string(dir.path().join("initial.txt")).unwrap();
        assert!(initial.contains("Turing Machine Simulator"));
        assert!(initial.contains("State: start"));

        let final_frame = fs::read_to_string(dir.path().join("final.txt")).unwrap();
        assert!(final_frame.contains("HALTED"));
        assert!(final_frame.contains("Steps: 9"));
    }
}
