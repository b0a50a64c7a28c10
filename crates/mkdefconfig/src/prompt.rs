use std::io::{self, BufRead, Write};

use crate::interrupt::PendingPrompt;

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, msg: &str) -> io::Result<bool>;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, msg: &str) -> io::Result<bool> {
        (**self).confirm(msg)
    }
}

/// Prompts on a terminal until the answer is exactly `y` or `n`.
///
/// Running out of input counts as `n`. Ctrl-C while waiting exits with
/// status 0 once [`interrupt::install`](crate::interrupt::install) has run.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, msg: &str) -> io::Result<bool> {
        let _pending = PendingPrompt::start();
        loop {
            write!(self.output, "{msg} (y/n)? ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }
            match answer.trim_end_matches(['\r', '\n']) {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            }
        }
    }
}
