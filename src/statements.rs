use std::fmt;

use paging::{PagingEngine, VmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    Access(usize),
    Read(usize),
    Write(usize, u8),
    Flush,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    Parse(String),
    Vm(VmError),
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementError::Parse(msg) => write!(f, "syntax error: {}", msg),
            StatementError::Vm(e) => write!(f, "error: {}", e),
        }
    }
}

impl std::error::Error for StatementError {}

impl From<VmError> for StatementError {
    fn from(e: VmError) -> Self {
        StatementError::Vm(e)
    }
}

/// Accepts decimal or `0x` hex, with an optional leading `-`.
pub fn parse_number(token: &str) -> Result<i64, StatementError> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let invalid = || StatementError::Parse(format!("invalid number '{}'", token));
    let (body, radix) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };
    // from_str_radix takes its own sign, only the one stripped above is allowed.
    if body.starts_with(|c: char| c == '+' || c == '-') {
        return Err(invalid());
    }
    let value = i64::from_str_radix(body, radix).map_err(|_| invalid())?;
    if negative {
        value.checked_neg().ok_or_else(invalid)
    } else {
        Ok(value)
    }
}

fn parse_index(token: &str) -> Result<usize, StatementError> {
    let value = parse_number(token)?;
    usize::try_from(value)
        .map_err(|_| StatementError::Parse(format!("'{}' must not be negative", token)))
}

impl Statement {
    pub fn prepare(input: &str) -> Result<Self, StatementError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        match tokens.as_slice() {
            ["access", page] => Ok(Statement::Access(parse_index(page)?)),
            ["read", address] => Ok(Statement::Read(parse_index(address)?)),
            // Only the low 8 bits of the value are stored.
            ["write", address, value] => Ok(Statement::Write(
                parse_index(address)?,
                parse_number(value)? as u8,
            )),
            ["flush"] => Ok(Statement::Flush),
            [keyword, ..] => Err(StatementError::Parse(format!(
                "unrecognized statement '{}'",
                keyword
            ))),
            [] => Err(StatementError::Parse(String::from("empty statement"))),
        }
    }

    pub fn execute<
        const PAGE_SIZE: usize,
        const VIRTUAL_PAGES: usize,
        const PHYSICAL_FRAMES: usize,
    >(
        &self,
        vm: &mut PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>,
    ) -> Result<String, StatementError> {
        match *self {
            Statement::Access(page) => {
                let faults = vm.stats().faults;
                let frame = vm.ensure_resident(page)?;
                let kind = if vm.stats().faults > faults { "fault" } else { "hit" };
                Ok(format!("page {} -> frame {} ({})", page, frame, kind))
            }
            Statement::Read(address) => {
                let value = vm.read_byte(address)?;
                Ok(format!("[{:#x}] = {} ({:#04x})", address, value, value))
            }
            Statement::Write(address, value) => {
                vm.write_byte(address, value)?;
                Ok(format!("[{:#x}] <- {} ({:#04x})", address, value, value))
            }
            Statement::Flush => {
                let written = vm.flush()?;
                Ok(format!("flushed {} pages", written))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Vm = PagingEngine<256, 16, 8>;

    #[test]
    fn parse_numbers() {
        assert_eq!(parse_number("42").unwrap(), 42);
        assert_eq!(parse_number("0x1f").unwrap(), 31);
        assert_eq!(parse_number("0X10").unwrap(), 16);
        assert_eq!(parse_number("-1").unwrap(), -1);
        assert_eq!(parse_number("-0x2").unwrap(), -2);
        assert!(parse_number("abc").is_err());
        assert!(parse_number("").is_err());
    }

    #[test]
    fn parse_rejects_extra_signs() {
        assert!(parse_number("--3").is_err());
        assert!(parse_number("+3").is_err());
        assert!(parse_number("-+3").is_err());
        assert!(parse_number("0x-5").is_err());
        assert!(parse_number("0x+5").is_err());
        assert!(matches!(
            Statement::prepare("access --3"),
            Err(StatementError::Parse(_))
        ));
    }

    #[test]
    fn parse_out_of_range_is_an_error() {
        assert!(parse_number("--9223372036854775808").is_err());
        assert!(parse_number("9223372036854775808").is_err());
        assert_eq!(parse_number("-9223372036854775807").unwrap(), -i64::MAX);
        assert!(matches!(
            Statement::prepare("write 0 --9223372036854775808"),
            Err(StatementError::Parse(_))
        ));
    }

    #[test]
    fn prepare_statements() {
        assert_eq!(Statement::prepare("access 3"), Ok(Statement::Access(3)));
        assert_eq!(Statement::prepare("read 0x100"), Ok(Statement::Read(256)));
        assert_eq!(
            Statement::prepare("  write   10 171 "),
            Ok(Statement::Write(10, 171))
        );
        assert_eq!(Statement::prepare("flush"), Ok(Statement::Flush));
    }

    #[test]
    fn write_value_is_truncated() {
        assert_eq!(
            Statement::prepare("write 0 0x1ff"),
            Ok(Statement::Write(0, 0xff))
        );
        assert_eq!(
            Statement::prepare("write 0 -1"),
            Ok(Statement::Write(0, 0xff))
        );
        assert_eq!(Statement::prepare("write 0 256"), Ok(Statement::Write(0, 0)));
    }

    #[test]
    fn prepare_errors() {
        assert!(matches!(
            Statement::prepare("jump 3"),
            Err(StatementError::Parse(_))
        ));
        assert!(matches!(
            Statement::prepare("read -4"),
            Err(StatementError::Parse(_))
        ));
        assert!(matches!(
            Statement::prepare("write 1"),
            Err(StatementError::Parse(_))
        ));
        assert!(matches!(Statement::prepare(""), Err(StatementError::Parse(_))));
    }

    #[test]
    fn execute_statements() {
        let mut vm = Vm::new();
        assert_eq!(
            Statement::Access(2).execute(&mut vm).unwrap(),
            "page 2 -> frame 0 (fault)"
        );
        assert_eq!(
            Statement::Access(2).execute(&mut vm).unwrap(),
            "page 2 -> frame 0 (hit)"
        );
        assert_eq!(
            Statement::Write(0x10, 171).execute(&mut vm).unwrap(),
            "[0x10] <- 171 (0xab)"
        );
        assert_eq!(
            Statement::Read(0x10).execute(&mut vm).unwrap(),
            "[0x10] = 171 (0xab)"
        );
        assert_eq!(Statement::Flush.execute(&mut vm).unwrap(), "flushed 1 pages");
    }

    #[test]
    fn execute_reports_vm_errors() {
        let mut vm = Vm::new();
        assert_eq!(
            Statement::Access(16).execute(&mut vm),
            Err(StatementError::Vm(VmError::InvalidPageNumber(16)))
        );
        assert_eq!(
            Statement::Read(4096).execute(&mut vm),
            Err(StatementError::Vm(VmError::InvalidAddress(4096)))
        );
    }
}
