// Turns one line of user input into catalog indices, and runs the prompt loop
// around it.
//
// `parse_selection` is pure. `prompt_selection` is generic over its reader and writer;
// the binary hands it `/dev/tty` (or stdin) and stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use colored::Colorize;

use crate::errors::SelectionError;
use crate::log_debug;

const PROMPT: &str =
    "Enter the numbers of the fonts to install (e.g., \"1 2 3\") or type \"all\" to install all fonts: ";

/// Parses a selection line against a catalog of `catalog_size` fonts.
///
/// * `all` (exact, case-sensitive) selects every index.
/// * Otherwise each whitespace-separated token must be a base-10 integer in
///   `[1, catalog_size]`; the result holds zero-based indices in input order.
/// * One bad token rejects the whole line.
/// * At most `max_tokens` tokens are considered; the rest of the line is ignored.
pub fn parse_selection(
    line: &str,
    catalog_size: usize,
    max_tokens: usize,
) -> Result<Vec<usize>, SelectionError> {
    let line = line.trim_end_matches(['\n', '\r']);

    if line.trim().is_empty() {
        return Err(SelectionError::EmptyInput);
    }

    if line == "all" {
        return Ok((0..catalog_size).collect());
    }

    line.split_whitespace()
        .take(max_tokens)
        .map(|token| parse_index(token, catalog_size))
        .collect()
}

fn parse_index(token: &str, catalog_size: usize) -> Result<usize, SelectionError> {
    let invalid = SelectionError::InvalidToken { max: catalog_size };
    let number: usize = token.parse().map_err(|_| invalid.clone())?;
    if (1..=catalog_size).contains(&number) {
        Ok(number - 1)
    } else {
        Err(invalid)
    }
}

/// Keeps the first occurrence of every index, preserving order.
pub fn dedup_preserving_order(indices: &[usize]) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    indices.iter().copied().filter(|i| seen.insert(*i)).collect()
}

/// Prompts until a valid selection is entered.
///
/// Returns `Ok(None)` when input ends before a valid line was read. Invalid lines are
/// answered with an error message and a fresh prompt.
pub fn prompt_selection<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    catalog_size: usize,
    max_tokens: usize,
) -> io::Result<Option<Vec<usize>>> {
    let mut raw = Vec::new();
    loop {
        write!(output, "{}", PROMPT.cyan())?;
        output.flush()?;

        raw.clear();
        let read = match input.read_until(b'\n', &mut raw) {
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if read == 0 {
            writeln!(output, "\nEnd of input reached. Exiting selection.")?;
            return Ok(None);
        }

        // Bytes that are not UTF-8 can never be a number or "all".
        let parsed = match std::str::from_utf8(&raw) {
            Ok(line) => parse_selection(line, catalog_size, max_tokens),
            Err(_) => Err(SelectionError::InvalidToken { max: catalog_size }),
        };

        match parsed {
            Ok(indices) => {
                log_debug!("[Selection] {} font(s) selected", indices.len());
                return Ok(Some(indices));
            }
            Err(e) => {
                writeln!(output, "{}", format!("Error: {e}.").red())?;
            }
        }
    }
}

/// Where selection input is read from: the controlling terminal when there is one,
/// so a pager or redirected stdin does not swallow the answer; stdin otherwise.
pub fn open_selection_input() -> Box<dyn BufRead> {
    match File::open("/dev/tty") {
        Ok(tty) => Box::new(BufReader::new(tty)),
        Err(e) => {
            log_debug!("[Selection] /dev/tty unavailable ({}), reading stdin", e);
            Box::new(BufReader::new(io::stdin()))
        }
    }
}
