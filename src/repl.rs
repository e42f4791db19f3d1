use std::io::{self, BufRead, Write};

use log::debug;
use paging::PagingEngine;

use crate::{
    meta_commands::{handle_meta_command, MetaCommand, MetaCommandError},
    statements::Statement,
};

pub struct REPL<R> {
    input: R,
    interactive: bool,
}

impl<R: BufRead> REPL<R> {
    /// `interactive` turns on the prompt.
    pub fn new(input: R, interactive: bool) -> Self {
        Self { input, interactive }
    }

    /// `None` once the input is exhausted.
    pub fn read_line(&mut self) -> Result<Option<String>, io::Error> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim().to_string()))
    }

    /// Runs commands until `.exit` or end of input. Statement errors are
    /// reported on `out` and the loop carries on.
    pub fn run<W, const PAGE_SIZE: usize, const VIRTUAL_PAGES: usize, const PHYSICAL_FRAMES: usize>(
        &mut self,
        vm: &mut PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>,
        out: &mut W,
    ) -> Result<(), io::Error>
    where
        W: Write,
    {
        loop {
            if self.interactive {
                write!(out, "vm > ")?;
                out.flush()?;
            }
            let Some(line) = self.read_line()? else {
                break;
            };
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            debug!("Command: {}", line);

            if line.starts_with('.') {
                match handle_meta_command(&line, vm) {
                    Ok(MetaCommand::Exit) => break,
                    Ok(MetaCommand::Output(text)) => writeln!(out, "{}", text)?,
                    Err(MetaCommandError::UnrecognizedCommand) => {
                        writeln!(out, "Unrecognized command '{}'", line)?
                    }
                }
                continue;
            }

            let result = Statement::prepare(&line).and_then(|statement| statement.execute(vm));
            match result {
                Ok(text) => writeln!(out, "{}", text)?,
                Err(e) => writeln!(out, "{}", e)?,
            }
        }
        Ok(())
    }
}
