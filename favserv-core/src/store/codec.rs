//! Line codec for the favorites file
//!
//! Each record occupies one line of `|`-separated fields:
//!
//! ```text
//! id|name|hostname|port|password|preferredIdentity[|showInLauncher|launcherColor]
//! ```
//!
//! A literal `|` inside a value is written as `\|`. Blank lines and lines
//! starting with `#` carry no record.

use thiserror::Error;

use crate::models::{DEFAULT_PORT, RecordId, ServerRecord};

/// Comment line written at the top of every saved favorites file
pub const FILE_HEADER: &str = "# favserv favorites - format: \
     id|name|hostname|port|password|preferredIdentity[|showInLauncher|launcherColor]";

/// Minimum number of fields a record line must carry
pub const MIN_FIELDS: usize = 4;

const SEPARATOR: char = '|';
const ESCAPE: char = '\\';

/// Errors raised while decoding a record line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The line has fewer than [`MIN_FIELDS`] fields
    #[error("Expected at least {} fields, found {found}", MIN_FIELDS)]
    TooFewFields {
        /// Number of fields actually present
        found: usize,
    },
}

/// Escapes every `|` in a field value
fn escape_field(value: &str) -> String {
    value.replace(SEPARATOR, "\\|")
}

/// Splits a line on unescaped `|`, turning `\|` back into `|`
///
/// Any other backslash is kept as-is.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE if chars.peek() == Some(&SEPARATOR) => {
                current.push(SEPARATOR);
                chars.next();
            }
            SEPARATOR => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses a stored port, falling back to [`DEFAULT_PORT`]
fn parse_port(value: &str) -> u16 {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => DEFAULT_PORT,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "True" | "TRUE")
}

/// Returns true if the line carries no record
#[must_use]
pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Encodes a record as a single line (without a trailing newline)
#[must_use]
pub fn encode_record(record: &ServerRecord) -> String {
    let mut fields = vec![
        escape_field(record.id.as_str()),
        escape_field(&record.name),
        escape_field(&record.hostname),
        record.port.to_string(),
        escape_field(&record.password),
        escape_field(&record.preferred_identity),
    ];

    if record.has_launcher_hints() {
        fields.push(if record.show_in_launcher { "1" } else { "0" }.to_string());
        fields.push(escape_field(record.launcher_color.as_deref().unwrap_or("")));
    }

    fields.join("|")
}

/// Decodes one line of the favorites file
///
/// Returns `Ok(None)` for comment and blank lines.
///
/// # Errors
///
/// Returns [`CodecError::TooFewFields`] if the line has fewer than
/// [`MIN_FIELDS`] fields.
pub fn decode_record(line: &str) -> Result<Option<ServerRecord>, CodecError> {
    if is_comment_or_blank(line) {
        return Ok(None);
    }

    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = split_fields(line).into_iter();
    let found = fields.len();
    if found < MIN_FIELDS {
        return Err(CodecError::TooFewFields { found });
    }

    let mut next = || fields.next().unwrap_or_default();
    let id = next();
    let name = next();
    let hostname = next();
    let port = parse_port(&next());
    let password = next();
    let preferred_identity = next();
    let show_in_launcher = parse_flag(&next());
    let launcher_color = Some(next()).filter(|c| !c.is_empty());

    Ok(Some(ServerRecord {
        id: RecordId::from_string(id),
        name,
        hostname,
        port,
        password,
        preferred_identity,
        show_in_launcher,
        launcher_color,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, host: &str) -> ServerRecord {
        ServerRecord {
            id: RecordId::from("abc-123"),
            name: name.to_string(),
            hostname: host.to_string(),
            port: 2457,
            password: String::new(),
            preferred_identity: String::new(),
            show_in_launcher: false,
            launcher_color: None,
        }
    }

    #[test]
    fn test_encode_six_fields() {
        let mut r = record("Home", "10.0.0.1");
        r.password = "secret".to_string();
        r.preferred_identity = "ragnar".to_string();
        assert_eq!(encode_record(&r), "abc-123|Home|10.0.0.1|2457|secret|ragnar");
    }

    #[test]
    fn test_encode_escapes_pipes() {
        let mut r = record("A|B", "host");
        r.password = "p|w".to_string();
        assert_eq!(encode_record(&r), "abc-123|A\\|B|host|2457|p\\|w|");
    }

    #[test]
    fn test_encode_launcher_hints_appended() {
        let mut r = record("Home", "host");
        r.show_in_launcher = true;
        r.launcher_color = Some("#ff8800".to_string());
        assert_eq!(encode_record(&r), "abc-123|Home|host|2457|||1|#ff8800");
    }

    #[test]
    fn test_decode_comment_and_blank() {
        assert_eq!(decode_record("# header"), Ok(None));
        assert_eq!(decode_record(""), Ok(None));
        assert_eq!(decode_record("   "), Ok(None));
    }

    #[test]
    fn test_decode_too_few_fields() {
        assert_eq!(
            decode_record("a|b"),
            Err(CodecError::TooFewFields { found: 2 })
        );
    }

    #[test]
    fn test_decode_minimal_line() {
        let r = decode_record("id1|Home|example.org|2456")
            .unwrap()
            .unwrap();
        assert_eq!(r.id.as_str(), "id1");
        assert_eq!(r.hostname, "example.org");
        assert_eq!(r.port, 2456);
        assert!(r.password.is_empty());
        assert!(r.preferred_identity.is_empty());
        assert!(!r.show_in_launcher);
        assert_eq!(r.launcher_color, None);
    }

    #[test]
    fn test_decode_bad_port_falls_back() {
        for port in ["abc", "", "0", "70000", "-1"] {
            let line = format!("id|n|h|{port}|pw");
            let r = decode_record(&line).unwrap().unwrap();
            assert_eq!(r.port, DEFAULT_PORT, "port {port:?}");
            assert_eq!(r.password, "pw");
        }
    }

    #[test]
    fn test_decode_unescapes_pipes() {
        let r = decode_record("id|A\\|B|host|2456|p\\|w|id\\|x")
            .unwrap()
            .unwrap();
        assert_eq!(r.name, "A|B");
        assert_eq!(r.password, "p|w");
        assert_eq!(r.preferred_identity, "id|x");
    }

    #[test]
    fn test_decode_keeps_other_backslashes() {
        let r = decode_record("id|C:\\games|host|2456").unwrap().unwrap();
        assert_eq!(r.name, "C:\\games");
    }

    #[test]
    fn test_decode_strips_carriage_return() {
        let r = decode_record("id|n|h|2456|pw|who\r").unwrap().unwrap();
        assert_eq!(r.preferred_identity, "who");
    }

    #[test]
    fn test_roundtrip_with_hints() {
        let mut r = record("Pipe | Server", "host");
        r.launcher_color = Some("teal".to_string());
        let decoded = decode_record(&encode_record(&r)).unwrap().unwrap();
        assert_eq!(decoded, r);
    }
}
