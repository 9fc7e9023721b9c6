//! Interactive yes/no confirmation over a reader/writer pair (stdin/stderr in
//! the CLI).

use std::cell::RefCell;
use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::domain::error::BacktestError;
use crate::domain::signal::Signal;
use crate::ports::confirm_port::ConfirmPort;

pub struct PromptConfirmAdapter<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> PromptConfirmAdapter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R: BufRead, W: Write> ConfirmPort for PromptConfirmAdapter<R, W> {
    /// Only an answer of `yes` or `y` (any case) accepts; end of input declines.
    fn confirm(&self, date: NaiveDate, price: f64, suggested: Signal) -> Result<bool, BacktestError> {
        {
            let mut out = self.output.borrow_mut();
            let verb = match suggested {
                Signal::Buy => "Buy",
                Signal::Sell => "Sell",
                Signal::Hold => "Hold",
            };
            write!(
                out,
                "{date}: signal suggests {suggested} at ${price:.2}. {verb}? (yes/no): "
            )?;
            out.flush()?;
        }

        let mut line = String::new();
        self.input.borrow_mut().read_line(&mut line)?;
        Ok(matches!(line.trim().to_lowercase().as_str(), "yes" | "y"))
    }
}
