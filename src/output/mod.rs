mod builds;
mod progress;
mod statistics;
mod styling;

pub use builds::render_recent_builds;
pub use progress::FetchProgress;
pub use statistics::StepTimings;
pub use styling::{dim, magenta_bold};

/// Prints the circle-wait banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("⏳ circle-wait"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Wait for CircleCI builds")
    );
}
