use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// Parses a spreadsheet column letter (`A`, `Z`, `AA`) into a zero-based index.
pub fn parse_column_letter(field_name: &str, letter: &str) -> Result<u32> {
    let trimmed = letter.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) || trimmed.len() > 3 {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: letter.to_string(),
            reason: "Column must be one to three letters, e.g. A or AB".to_string(),
        });
    }

    let index = trimmed
        .chars()
        .map(|c| c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        .fold(0u32, |acc, digit| acc * 26 + digit);
    Ok(index - 1)
}

pub fn parse_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Expected a YYYY-MM-DD date: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("paths.raw_dir", "data/raw").is_ok());
        assert!(validate_path("paths.raw_dir", "").is_err());
        assert!(validate_path("paths.raw_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("xlsx.input", "Feedback.xlsx", &["xlsx"]).is_ok());
        assert!(validate_file_extension("xlsx.input", "Feedback.XLSX", &["xlsx"]).is_ok());
        assert!(validate_file_extension("xlsx.input", "Feedback.xls", &["xlsx"]).is_err());
        assert!(validate_file_extension("xlsx.input", "Feedback", &["xlsx"]).is_err());
    }

    #[test]
    fn test_parse_column_letter() {
        assert_eq!(parse_column_letter("xlsx.column", "A").unwrap(), 0);
        assert_eq!(parse_column_letter("xlsx.column", "b").unwrap(), 1);
        assert_eq!(parse_column_letter("xlsx.column", "Z").unwrap(), 25);
        assert_eq!(parse_column_letter("xlsx.column", "AA").unwrap(), 26);
        assert_eq!(parse_column_letter("xlsx.column", "AB").unwrap(), 27);
        assert!(parse_column_letter("xlsx.column", "").is_err());
        assert!(parse_column_letter("xlsx.column", "A1").is_err());
    }

    #[test]
    fn test_parse_date() {
        let start = parse_date("sales.start", " 2024-01-01 ").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(parse_date("sales.start", "01/02/2024").is_err());
        assert!(parse_date("sales.end", "2024-13-01").is_err());
    }
}
