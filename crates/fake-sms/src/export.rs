//! Export a query's messages to `<number>.json`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::types::{Message, SmsError, SmsResult};

/// File name of the export for `number`.
pub fn export_file_name(number: &str) -> String {
    format!("{number}.json")
}

/// Tab-indented JSON array of `{body, created_at, originator}`.
pub fn render_messages(messages: &[Message]) -> SmsResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    messages.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| SmsError::Store {
        path: PathBuf::new(),
        message: format!("export is not UTF-8: {e}"),
    })
}

/// Write `messages` to `dir/<number>.json`, replacing any earlier export.
pub fn export_messages(dir: &Path, number: &str, messages: &[Message]) -> SmsResult<PathBuf> {
    let path = dir.join(export_file_name(number));
    let body = render_messages(messages)?;
    std::fs::write(&path, body).map_err(|e| SmsError::store(&path, e))?;
    tracing::info!("Exported {} messages to {}", messages.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_uses_tabs_and_export_field_order() {
        let rendered = render_messages(&[Message::new("Acme", "Code 1", "now")]).unwrap();
        assert_eq!(
            rendered,
            "[\n\t{\n\t\t\"body\": \"Code 1\",\n\t\t\"created_at\": \"now\",\n\t\t\"originator\": \"Acme\"\n\t}\n]"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_messages(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_export_writes_number_file() {
        let dir = tempfile::tempdir().unwrap();
        let messages = vec![
            Message::new("Acme", "Code 1", "now"),
            Message::new("Bank", "Code 2", "1 minute ago"),
        ];

        let path = export_messages(dir.path(), "+15551234567", &messages).unwrap();
        assert_eq!(path, dir.path().join("+15551234567.json"));

        let loaded: Vec<Message> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, messages);
    }
}
