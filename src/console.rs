use crate::clock::Clock;
use crate::stopwatch::{Event, Stopwatch};
use std::io::{BufRead, Write};
use std::time::Duration;

const MENU: &str = "\
StopWatch FSM example

s: Starts/Stops stop watch
r: Resets stop watch
d: Displays the elapsed time in seconds
e: Exits the program

You may chain commands, e.g. rs resets and starts stop watch
";

// Moves the cursor up one line and clears it.
const CLEAR_LINE: &str = "\x1b[A\x1b[K";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Event(Event),
    Display,
    Exit,
    Invalid(char),
}

impl From<char> for Command {
    fn from(key: char) -> Self {
        match key {
            's' => Command::Event(Event::Toggle),
            'r' => Command::Event(Event::Reset),
            'd' => Command::Display,
            'e' => Command::Exit,
            other => Command::Invalid(other),
        }
    }
}

/// Formats a duration as whole seconds.
pub fn render_seconds(elapsed: Duration) -> String {
    elapsed.as_secs().to_string()
}

pub struct Console<R, W, C> {
    input: R,
    output: W,
    stopwatch: Stopwatch<C>,
    redraw: bool,
}

impl<R, W, C> Console<R, W, C>
where
    R: BufRead,
    W: Write,
    C: Clock,
{
    pub fn new(input: R, output: W, stopwatch: Stopwatch<C>) -> Self {
        Self {
            input,
            output,
            stopwatch,
            redraw: false,
        }
    }

    /// Erase each echoed input line after it is read.
    pub fn with_redraw(mut self, redraw: bool) -> Self {
        self.redraw = redraw;
        self
    }

    pub fn stopwatch(&self) -> &Stopwatch<C> {
        &self.stopwatch
    }

    pub fn into_parts(self) -> (W, Stopwatch<C>) {
        (self.output, self.stopwatch)
    }

    /// Runs until an exit command or the end of the input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{MENU}")?;
        self.output.flush()?;

        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            if self.input.read_until(b'\n', &mut buffer)? == 0 {
                tracing::debug!("Reached the end of the input");
                return Ok(());
            }

            // Non UTF-8 bytes decode to U+FFFD, an invalid key.
            let line = String::from_utf8_lossy(&buffer);

            if self.redraw {
                write!(self.output, "{CLEAR_LINE}")?;
            }

            for key in line.chars().filter(|c| !c.is_whitespace()) {
                if !self.dispatch(Command::from(key))? {
                    return Ok(());
                }
            }

            self.output.flush()?;
        }
    }

    // Returns false once the loop should stop.
    fn dispatch(&mut self, command: Command) -> anyhow::Result<bool> {
        tracing::trace!(?command, "Dispatching command");

        match command {
            Command::Event(event) => self.stopwatch.handle(event),
            Command::Display => match self.stopwatch.elapsed() {
                Ok(elapsed) => {
                    writeln!(self.output, "Elapsed time: {}", render_seconds(elapsed))?;
                }
                Err(e) => {
                    tracing::warn!(%e, "Unable to read the elapsed time");
                    writeln!(self.output, "Clock fault: {e}")?;
                }
            },
            Command::Exit => return Ok(false),
            Command::Invalid(key) => {
                tracing::debug!(%key, "Ignoring invalid key");
                writeln!(self.output, "Invalid key!")?;
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from('s'), Command::Event(Event::Toggle));
        assert_eq!(Command::from('r'), Command::Event(Event::Reset));
        assert_eq!(Command::from('d'), Command::Display);
        assert_eq!(Command::from('e'), Command::Exit);
        assert_eq!(Command::from('S'), Command::Invalid('S'));
        assert_eq!(Command::from('x'), Command::Invalid('x'));
    }

    #[test]
    fn renders_whole_seconds() {
        assert_eq!(render_seconds(Duration::ZERO), "0");
        assert_eq!(render_seconds(Duration::from_millis(2_999)), "2");
        assert_eq!(render_seconds(Duration::from_secs(3_661)), "3661");
    }
}
