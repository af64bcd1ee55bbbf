use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::TreeBuild;

use super::styling::state_color;

/// Number of builds shown by `builds`.
pub const RECENT_BUILD_COUNT: usize = 5;

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Table of the most recent builds of a branch, status colour-coded.
pub fn render_recent_builds(builds: &[TreeBuild]) -> String {
    let mut table = create_table();
    table.set_header(create_cyan_header(&["Build", "Status", "URL", "Compare"]));

    for build in builds.iter().take(RECENT_BUILD_COUNT) {
        table.add_row(vec![
            Cell::new(build.build_num),
            Cell::new(&build.status).fg(state_color(build.state())),
            Cell::new(&build.build_url),
            Cell::new(build.compare_url.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}
