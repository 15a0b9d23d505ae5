//! Reading secrets from standard input.

use std::io::{self, BufRead, IsTerminal, Write};

/// Reads one line from `input` as a password, without its line ending.
///
/// An empty line or end of input is an error.
pub fn read_password(input: impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    let mut input = input;
    input.read_line(&mut line)?;

    let password = line.trim_end_matches(['\n', '\r']);
    if password.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "No password given on standard input",
        ));
    }
    Ok(password.to_string())
}

/// Reads the password from stdin, asking for it on stderr when stdin is a
/// terminal.
pub fn password_from_stdin() -> io::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        let mut stderr = io::stderr();
        write!(stderr, "Password: ")?;
        stderr.flush()?;
    }
    read_password(stdin.lock())
}
