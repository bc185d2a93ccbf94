//! Response printing.

use std::io::Write;

use serde_json::Value;

/// Writes a response as pretty JSON, or `confirmation` when the service
/// returned no body.
///
/// # Errors
/// - If the output cannot be written
pub fn emit<W: Write + ?Sized>(out: &mut W, response: &Value, confirmation: &str) -> anyhow::Result<()> {
    if response.is_null() {
        writeln!(out, "{confirmation}")?;
    } else {
        writeln!(out, "{}", serde_json::to_string_pretty(response)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_pretty_prints_with_two_spaces() {
        let mut out = Vec::new();
        emit(&mut out, &json!({ "status": "ready" }), "unused").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"status\": \"ready\"\n}\n");
    }

    #[test]
    fn test_emit_confirmation_for_empty_body() {
        let mut out = Vec::new();
        emit(&mut out, &Value::Null, "Deleted corpus express").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Deleted corpus express\n");
    }
}
