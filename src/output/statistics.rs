use std::fmt::Write;

use console::style;

use crate::duration::{format_duration, round_runtime};
use crate::providers::BuildDetail;

const STEP_WIDTH: usize = 45;
const CELL_WIDTH: usize = 8;
/// 256-colour red used for failed cells.
const FAILED_COLOR: u8 = 160;

/// One duration in the step/container matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingCell {
    pub text: String,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRow {
    pub step: String,
    pub cells: Vec<TimingCell>,
}

/// Per-step, per-container runtimes of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTimings {
    pub containers: u32,
    pub rows: Vec<TimingRow>,
}

impl StepTimings {
    pub fn from_build(build: &BuildDetail) -> Self {
        let rows = build
            .steps
            .iter()
            .map(|step| TimingRow {
                step: step.name.clone(),
                cells: step
                    .actions
                    .iter()
                    .map(|action| TimingCell {
                        text: format_duration(round_runtime(action.runtime)),
                        failed: action.failed(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            containers: build.parallel,
            rows,
        }
    }

    /// Renders the fixed-width table. Failed cells are coloured only when
    /// `interactive` is set, so redirected output stays free of escapes.
    pub fn render(&self, interactive: bool) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:<STEP_WIDTH$}", "Step");
        for container in 0..self.containers {
            let _ = write!(out, "{container:<CELL_WIDTH$}");
        }
        let width = STEP_WIDTH + CELL_WIDTH * self.containers as usize;
        let _ = writeln!(out, "\n{}", "=".repeat(width));

        for row in &self.rows {
            out.push_str(&step_label(&row.step));
            for cell in &row.cells {
                let padded = format!("{:<CELL_WIDTH$}", cell.text);
                if cell.failed && interactive {
                    let _ = write!(
                        out,
                        "{}",
                        style(padded).color256(FAILED_COLOR).force_styling(true)
                    );
                } else {
                    out.push_str(&padded);
                }
            }
            out.push('\n');
        }
        out
    }
}

fn step_label(name: &str) -> String {
    let max = STEP_WIDTH - 2;
    if name.chars().count() > max {
        let truncated: String = name.chars().take(max).collect();
        format!("{truncated}… ")
    } else {
        format!("{name:<STEP_WIDTH$}")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::providers::{Action, Step};

    fn action(status: &str, millis: u64) -> Action {
        Action {
            name: "run".to_string(),
            status: status.to_string(),
            runtime: Duration::from_millis(millis),
            output_url: None,
        }
    }

    fn build() -> BuildDetail {
        BuildDetail {
            build_num: 12,
            parallel: 2,
            steps: vec![
                Step {
                    name: "Starting the build".to_string(),
                    actions: vec![action("success", 999), action("success", 1_234)],
                },
                Step {
                    name: "go test -race ./...".to_string(),
                    actions: vec![action("success", 61_000), action("failed", 75_600)],
                },
            ],
        }
    }

    #[test]
    fn test_cells_are_rounded_and_flagged() {
        let timings = StepTimings::from_build(&build());
        assert_eq!(timings.containers, 2);
        assert_eq!(
            timings.rows[0].cells,
            vec![
                TimingCell { text: "1s".to_string(), failed: false },
                TimingCell { text: "1.23s".to_string(), failed: false },
            ]
        );
        assert_eq!(
            timings.rows[1].cells,
            vec![
                TimingCell { text: "1m1s".to_string(), failed: false },
                TimingCell { text: "1m16s".to_string(), failed: true },
            ]
        );
    }

    #[test]
    fn test_render_plain_layout() {
        let rendered = StepTimings::from_build(&build()).render(false);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], format!("{:<45}{:<8}{:<8}", "Step", 0, 1));
        assert_eq!(lines[1], "=".repeat(61));
        assert_eq!(lines[2], format!("{:<45}{:<8}{:<8}", "Starting the build", "1s", "1.23s"));
        assert_eq!(
            lines[3],
            format!("{:<45}{:<8}{:<8}", "go test -race ./...", "1m1s", "1m16s")
        );
        assert!(!rendered.contains('\u{1b}'));
    }

    #[test]
    fn test_render_colours_failed_cells_when_interactive() {
        let rendered = StepTimings::from_build(&build()).render(true);
        let failed_row = rendered.lines().nth(3).unwrap();
        assert!(failed_row.contains("38;5;160m"));
        assert!(failed_row.contains("1m16s   \u{1b}[0m"));
        // Passing cells stay plain.
        assert!(!rendered.lines().nth(2).unwrap().contains('\u{1b}'));
    }

    #[test]
    fn test_long_step_name_is_truncated() {
        let name = "a".repeat(60);
        let label = step_label(&name);
        assert_eq!(label, format!("{}… ", "a".repeat(43)));
        assert_eq!(label.chars().count(), STEP_WIDTH);
    }

    #[test]
    fn test_step_name_at_limit_is_padded() {
        let name = "b".repeat(43);
        assert_eq!(step_label(&name), format!("{name}  "));
    }
}
