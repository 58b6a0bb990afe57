//! Append-only transcript logging for chat sessions.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// Create a logging state; logging is active whenever a file was given.
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &log_file {
            test_file_access(path)?;
        }
        let is_active = log_file.is_some();
        Ok(LoggingState {
            file_path: log_file,
            is_active,
        })
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Append one transcript entry, preserving its line structure, followed
    /// by a blank line for spacing. Silently a no-op when logging is off.
    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };
        if !self.is_active {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!(
                "active ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            (Some(path), false) => format!(
                "paused ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
        }
    }
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn messages_append_with_spacing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transcript.log");
        let logging = LoggingState::new(Some(path.to_string_lossy().into_owned())).unwrap();

        logging.log_message("You: hello").unwrap();
        logging.log_message("line one\nline two").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "You: hello\n\nline one\nline two\n\n");
    }

    #[test]
    fn disabled_logging_writes_nothing() {
        let logging = LoggingState::new(None).unwrap();
        assert!(!logging.is_active());
        assert_eq!(logging.status_string(), "disabled");
        logging.log_message("dropped").unwrap();
    }
}
