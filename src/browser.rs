use std::process::{Command, Stdio};

use crate::error::Result;

/// Platform launcher that hands a URL to the default browser.
fn launcher(os: &str, url: &str) -> (&'static str, Vec<String>) {
    match os {
        "macos" => ("open", vec![url.to_string()]),
        // `start` treats the first quoted argument as a window title.
        "windows" => (
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        ),
        _ => ("xdg-open", vec![url.to_string()]),
    }
}

/// Opens `url` in the default browser without waiting for it to exit.
pub fn open(url: &str) -> Result<()> {
    let (program, args) = launcher(std::env::consts::OS, url);
    Command::new(program)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
