use crate::error::UploadError;
use std::fs;
use std::path::Path;

const SCHEMA_EXTENSIONS: [&str; 3] = ["sql", "json", "txt"];

/// Decodes an uploaded schema file. Content is kept verbatim; only the extension
/// and the UTF-8 encoding are checked.
pub fn decode_schema(file_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if !extension.is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext.as_str())) {
        return Err(UploadError::UnsupportedExtension(file_name.to_string()));
    }

    String::from_utf8(bytes.to_vec()).map_err(|_| UploadError::InvalidUtf8(file_name.to_string()))
}

pub fn read_schema_file(path: &Path) -> Result<String, UploadError> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| UploadError::Io {
        path: display.clone(),
        source,
    })?;
    decode_schema(&display, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_verbatim() {
        let text = "CREATE TABLE orders (\n  id INT\n);\n";
        assert_eq!(
            decode_schema("schema.SQL", text.as_bytes()).expect("sql should decode"),
            text
        );
        assert!(decode_schema("schema.json", b"{}").is_ok());
        assert!(decode_schema("notes.txt", b"").is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["schema.csv", "schema", ".sql.bak"] {
            assert!(matches!(
                decode_schema(name, b"x"),
                Err(UploadError::UnsupportedExtension(_))
            ));
        }
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            decode_schema("schema.sql", &[0xff, 0xfe, 0x00]),
            Err(UploadError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = read_schema_file(Path::new("/definitely/not/here.sql"))
            .expect_err("missing file should fail");
        assert!(error.to_string().contains("/definitely/not/here.sql"));
    }
}
