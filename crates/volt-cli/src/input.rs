//! Mention input reading.

use crate::error::Result;
use std::fs;
use std::io::{self, Read};
use volt_domain::Mention;

/// Read mentions from `source` ("-" for stdin)
///
/// Parsing is [`volt_enricher::parse_mentions`]; malformed content surfaces as
/// a pipeline error.
pub fn read_mentions(source: &str) -> Result<Vec<Mention>> {
    let text = if source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(source)?
    };
    Ok(volt_enricher::parse_mentions(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use volt_enricher::EnricherError;

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[\"Acme\", \"Globex\"]").unwrap();
        let mentions = read_mentions(file.path().to_str().unwrap()).unwrap();
        assert_eq!(mentions, vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_read_lines_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Acme Inc.\n\nInitech").unwrap();
        let mentions = read_mentions(file.path().to_str().unwrap()).unwrap();
        assert_eq!(mentions, vec!["Acme Inc.", "Initech"]);
    }

    #[test]
    fn test_malformed_file_is_pipeline_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"mentions\": [\"Acme\"]}}").unwrap();
        let result = read_mentions(file.path().to_str().unwrap());
        match result {
            Err(CliError::Pipeline(EnricherError::MalformedInput(message))) => {
                assert!(message.contains("an object"))
            }
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(read_mentions("/nonexistent/mentions.json"), Err(CliError::Io(_))));
    }
}
