// Report writers for uninitc findings.

use std::io::Write;

use crate::domain::finding::Finding;
use crate::ports::ReportWriter;

/// `line <N>: <declaration>` per finding.
pub struct TextReport;

impl ReportWriter for TextReport {
    fn write(&self, findings: &[Finding], out: &mut dyn Write) -> std::io::Result<()> {
        for finding in findings {
            writeln!(out, "{}", finding)?;
        }
        Ok(())
    }
}

/// Pretty-printed JSON array of findings.
pub struct JsonReport;

impl ReportWriter for JsonReport {
    fn write(&self, findings: &[Finding], out: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, findings)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings() -> Vec<Finding> {
        vec![
            Finding { line: 1, name: Some("a".into()), text: "int a".into() },
            Finding { line: 4, name: Some("c".into()), text: "char *c".into() },
        ]
    }

    #[test]
    fn test_text_report() {
        let mut buf = Vec::new();
        TextReport.write(&findings(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "line 1: int a\nline 4: char *c\n");
    }

    #[test]
    fn test_text_report_empty() {
        let mut buf = Vec::new();
        TextReport.write(&[], &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_json_report() {
        let mut buf = Vec::new();
        JsonReport.write(&findings(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[1]["line"], 4);
        assert_eq!(value[1]["name"], "c");
        assert_eq!(value[0]["text"], "int a");
    }
}
