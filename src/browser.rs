//! Opening a URL in the user's default browser.

use std::process::{Command, Stdio};

/// Open `url` in the default browser, suppressing launcher output.
///
/// Returns false when no launcher exists for the platform or the launcher
/// fails; callers fall back to printing the URL.
pub fn open_url(url: &str) -> bool {
    let mut command = if cfg!(target_os = "linux") {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else {
        return false;
    };

    command
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
