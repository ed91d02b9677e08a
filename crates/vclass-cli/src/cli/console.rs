//! Line-oriented console over any reader/writer pair.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use vclass_core::auth::{Fallback, FallbackSelector};
use vclass_core::fetch::FetchOutcome;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Print `message`, read one line. `None` on end of input.
    pub fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_fallback(&mut self) -> io::Result<Option<Fallback>> {
        self.say("")?;
        self.say("The portal seems to be down. Pick another way to reach it:")?;
        self.say("1. Retry with a fixed delay")?;
        self.say("2. Retry with exponential backoff")?;
        self.say("3. Go through a proxy")?;
        let Some(choice) = self.prompt("Choose an option (1/2/3): ")? else {
            return Ok(None);
        };
        match choice.as_str() {
            "1" => Ok(Some(Fallback::Retry)),
            "2" => Ok(Some(Fallback::Backoff)),
            "3" => {
                let proxy = self
                    .prompt("Proxy address (e.g. http://proxyserver:port): ")?
                    .unwrap_or_default();
                if proxy.is_empty() {
                    self.say("No proxy given.")?;
                    Ok(None)
                } else {
                    Ok(Some(Fallback::Proxy(proxy)))
                }
            }
            _ => {
                self.say("Invalid choice.")?;
                Ok(None)
            }
        }
    }
}

impl<R: BufRead, W: Write> FallbackSelector for Console<R, W> {
    fn choose(&mut self, url: &str, failure: &FetchOutcome) -> Option<Fallback> {
        tracing::debug!(url, ?failure, "prompting for fallback");
        match self.ask_fallback() {
            Ok(choice) => choice,
            Err(e) => {
                tracing::error!(error = %e, "console error while prompting for fallback");
                None
            }
        }
    }
}
