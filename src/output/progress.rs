use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_yellow};

/// Spinner shown on stderr while step output is downloaded.
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    /// Starts the spinner; draws nothing unless `interactive`.
    pub fn start(failed_actions: usize, interactive: bool) -> Self {
        if !interactive {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
            pb.set_style(style);
        }
        pb.set_message(
            bright_yellow(format!("Fetching output from {failed_actions} failed actions"))
                .to_string(),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb
            .finish_with_message(bright_green("Fetched output ✓").to_string());
    }

    pub fn abandon(self) {
        self.pb.abandon();
    }
}
