// Renders the font catalog as a numbered, multi-column menu.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use colored::Colorize;
use console::Term;

use crate::log_debug;

/// Width used when the terminal size cannot be queried.
pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Room for the "n. " prefix plus padding between columns.
const COLUMN_PADDING: usize = 8;

/// Lays `names` out column-major: numbers run down the first column, then the next.
///
/// Each column is as wide as the longest name plus padding; as many columns as
/// fit in `width` are used, and never fewer than one.
pub fn format_columns<S: AsRef<str>>(names: &[S], width: usize) -> String {
    if names.is_empty() {
        return String::new();
    }

    let max_len = names
        .iter()
        .map(|n| n.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    let col_width = max_len + COLUMN_PADDING;
    let columns = (width / col_width).max(1);
    let rows = names.len().div_ceil(columns);

    let mut out = String::new();
    for row in 0..rows {
        let mut line = String::new();
        for col in 0..columns {
            let idx = row + col * rows;
            if let Some(name) = names.get(idx) {
                let item = format!("{}. {}", idx + 1, name.as_ref());
                line.push_str(&format!("{item:<col_width$}"));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Terminal width in columns, or the default when stdout is not a terminal.
pub fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

/// Prints the menu, framed by the selection instructions.
///
/// With `use_pager` and an interactive stdout the listing goes through
/// `less -R -X -F`; `PAGER` is deliberately not consulted. If `less` cannot be
/// started the listing is printed directly.
pub fn display_menu<S: AsRef<str>>(names: &[S], use_pager: bool) -> io::Result<()> {
    let listing = format_columns(names, terminal_width());
    let mut stdout = io::stdout();

    writeln!(
        stdout,
        "{}",
        "Select fonts to install (separate with spaces, or enter \"all\" to install all fonts):"
            .green()
    )?;
    writeln!(stdout, "---------------------------------------------")?;
    stdout.flush()?;

    let paged = use_pager && Term::stdout().is_term() && page_through_less(&listing);
    if !paged {
        stdout.write_all(listing.as_bytes())?;
    }

    writeln!(stdout, "---------------------------------------------\n")?;
    stdout.flush()
}

fn page_through_less(listing: &str) -> bool {
    let mut child = match Command::new("less")
        .args(["-R", "-X", "-F"])
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            log_debug!("[Menu] Could not start less ({}), printing directly", e);
            return false;
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        // The user may quit less before reading everything; a broken pipe is expected.
        if let Err(e) = stdin.write_all(listing.as_bytes()) {
            log_debug!("[Menu] Pager input closed early: {}", e);
        }
    }

    match child.wait() {
        Ok(status) => {
            log_debug!("[Menu] Pager exited with {}", status);
            true
        }
        Err(e) => {
            log_debug!("[Menu] Waiting for pager failed: {}", e);
            false
        }
    }
}
