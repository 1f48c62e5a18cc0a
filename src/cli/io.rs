//! JSON output for one-shot commands
//!
//! One JSON object per invocation, newline-terminated, on stdout.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(&mut io::stdout(), data)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_error_to(&mut io::stdout(), code, message)
}

pub(crate) fn write_response_to<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(out, &response)
}

pub(crate) fn write_error_to<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_line(out, &response)
}

fn write_line<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_shape() {
        let mut out = Vec::new();
        write_response_to(&mut out, json!({"columns": 3, "rows": 2})).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"data\":{\"columns\":3,\"rows\":2},\"status\":\"ok\"}\n"
        );
    }

    #[test]
    fn test_error_shape() {
        let mut out = Vec::new();
        write_error_to(&mut out, "DAYLOG_EMPTY_TABLE", "Table has no rows").unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "DAYLOG_EMPTY_TABLE");
    }
}
