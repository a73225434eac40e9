use crate::error::VerificationError;

pub const PDF_MAGIC: &[u8] = b"%PDF-";
pub const PDF_MIME: &str = "application/pdf";

/// Client-side checks before a KvK extract is uploaded: `.pdf` name, `%PDF-` header, not
/// empty, at most `max_bytes`.
///
/// # Errors
/// [`VerificationError::InvalidDocument`] naming the first failed check.
pub fn check_document(file_name: &str, bytes: &[u8], max_bytes: u64) -> Result<(), VerificationError> {
    let invalid = |message: String| VerificationError::InvalidDocument { message: message.into(), context: None };

    let is_pdf_name = std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf_name {
        return Err(invalid(format!("{file_name} is not a .pdf file")));
    }
    if bytes.is_empty() {
        return Err(invalid(format!("{file_name} is empty")));
    }
    check_size(file_name, u64::try_from(bytes.len()).unwrap_or(u64::MAX), max_bytes)?;
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(invalid(format!("{file_name} does not look like a PDF")));
    }
    Ok(())
}

/// Size limit alone, usable before the document is read.
///
/// # Errors
/// [`VerificationError::InvalidDocument`] when `size` exceeds `max_bytes`.
pub fn check_size(file_name: &str, size: u64, max_bytes: u64) -> Result<(), VerificationError> {
    if size > max_bytes {
        return Err(VerificationError::InvalidDocument {
            message: format!("{file_name} is {size} bytes; the limit is {max_bytes}").into(),
            context: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_small_pdfs() {
        assert!(check_document("extract.PDF", b"%PDF-1.7\nkvkNumber: 12345678", 1024).is_ok());
    }

    #[test]
    fn rejects_each_failure() {
        let cases: [(&str, &[u8], u64, &str); 4] = [
            ("extract.txt", b"%PDF-1.7", 1024, "not a .pdf"),
            ("extract.pdf", b"", 1024, "is empty"),
            ("extract.pdf", b"%PDF-1.7 too large", 8, "the limit is 8"),
            ("extract.pdf", b"PK\x03\x04", 1024, "does not look like a PDF"),
        ];
        for (name, bytes, max, expected) in cases {
            let err = check_document(name, bytes, max).expect_err(name);
            assert!(err.to_string().contains(expected), "{err}");
        }
    }
}
