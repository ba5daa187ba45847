//! Numbered-choice prompts on the terminal.
use std::io::{self, BufRead, Write};

/// Print `options` as a numbered list and read a 1-based choice.
///
/// Returns the 0-based index of the chosen option.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidInput`] for non-numeric or out-of-range
/// input, and [`io::ErrorKind::UnexpectedEof`] when input is closed.
pub fn select<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    options: &[String],
) -> io::Result<usize> {
    writeln!(output, "\n{prompt}")?;
    for (i, option) in options.iter().enumerate() {
        writeln!(output, "  \x1b[1m{}\x1b[0m) {option}", i + 1)?;
    }
    write!(output, "\nSelect [1-{}]: ", options.len())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no selection made"));
    }

    let choice: usize = line.trim().parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid selection '{}'", line.trim()),
        )
    })?;

    if choice == 0 || choice > options.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("selection {choice} out of range"),
        ));
    }

    Ok(choice - 1)
}

/// [`select`] on the process's stdin and stdout.
///
/// # Errors
///
/// See [`select`].
pub fn prompt_select(prompt: &str, options: &[String]) -> io::Result<usize> {
    select(&mut io::stdin().lock(), &mut io::stdout().lock(), prompt, options)
}
