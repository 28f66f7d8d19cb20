/// CLI utilities for consistent output formatting
use std::io::IsTerminal;

/// Get a colored prefix
///
/// Returns bright cyan if stderr is a TTY, plain text otherwise.
pub fn casc_prefix() -> &'static str {
    if std::io::stderr().is_terminal() {
        "\x1b[96m[casc]\x1b[0m"
    } else {
        "[casc]"
    }
}

/// Status marker for one script outcome
pub fn outcome_marker(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "FAILED"
    }
}
