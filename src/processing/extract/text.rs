use std::path::Path;

use super::ExtractionOutcome;

/// Read the file as UTF-8, falling back to Latin-1 when the bytes are not valid UTF-8.
pub(super) fn extract(path: &Path) -> ExtractionOutcome {
    let bytes = std::fs::read(path)?;
    Ok(decode(bytes))
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(
                valid_up_to = err.utf8_error().valid_up_to(),
                "Input is not UTF-8; decoding as Latin-1"
            );
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_returned_verbatim() {
        assert_eq!(decode("año académico".as_bytes().to_vec()), "año académico");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // "año" encoded as ISO-8859-1
        assert_eq!(decode(vec![0x61, 0xF1, 0x6F]), "año");
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = extract(&dir.path().join("gone.txt"));
        assert!(matches!(outcome, Err(super::super::ExtractionError::Io(_))));
    }
}
