use crate::utils::error::{EtlError, Result};

pub fn validate_count(file_name: &str, count_of_records: usize) -> Result<()> {
    if count_of_records == 0 {
        return Err(EtlError::EmptyFileError {
            file_name: file_name.to_string(),
        });
    }

    tracing::info!(
        "{} - contains {} records - so proceeding",
        file_name,
        count_of_records
    );
    Ok(())
}

/// Lowercased text after the last `.`; a name without a dot is its own suffix.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}

pub fn validate_extension(file_name: &str, allowed: &[String]) -> Result<()> {
    let extension = file_extension(file_name);

    if !allowed
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(&extension))
    {
        return Err(EtlError::UnsupportedFormatError {
            file_name: file_name.to_string(),
            extension,
            allowed: allowed.join(", "),
        });
    }

    tracing::info!(
        "FileName : {} - file format is supported - so proceeding",
        file_name
    );
    Ok(())
}
