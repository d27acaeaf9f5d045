use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-oriented terminal conversation.
///
/// Generic over its streams so the interactive flow can be driven from
/// byte buffers in tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(
        input: R,
        output: W,
    ) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line, without its line ending.
    /// Returns `None` at end of input.
    pub fn ask(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Yes/no question defaulting to no. End of input counts as no.
    pub fn confirm(
        &mut self,
        question: &str,
    ) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N] "))?;
        Ok(matches!(
            answer.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }

    /// Print one block of text followed by a newline.
    pub fn say(
        &mut self,
        text: impl Display,
    ) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
