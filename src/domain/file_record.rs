use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// One imported file name with the title and year parsed out of it.
///
/// The file name is the unique key: its presence is the "already
/// processed" check when a batch is submitted again. Records are
/// insert-once and never mutated; only a full library clear removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Original file name as submitted (unique key)
    pub file_name: String,

    /// Title parsed from the file name
    pub title: String,

    /// Release year parsed from the file name, when present
    pub year: Option<String>,

    /// Creation timestamp in our database
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a new FileRecord
    pub fn new(file_name: String, title: String, year: Option<String>) -> Self {
        Self {
            file_name,
            title,
            year,
            created_at: Utc::now(),
        }
    }
}

/// Validates FileRecord invariants
pub fn validate_file_record(record: &FileRecord) -> DomainResult<()> {
    if record.file_name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "File name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_file_record() {
        let record = FileRecord::new(
            "The.Matrix.1999.mkv".to_string(),
            "The Matrix".to_string(),
            Some("1999".to_string()),
        );
        assert!(validate_file_record(&record).is_ok());
    }

    #[test]
    fn test_empty_file_name_fails() {
        let record = FileRecord::new(String::new(), "The Matrix".to_string(), None);
        assert!(validate_file_record(&record).is_err());
    }
}
