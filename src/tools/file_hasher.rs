use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 4 * 1024 * 1024; // 4MB buffer

/// SHA-1 digest of a file's content.
///
/// Used as the namespace for a video's temporary frame files, so identical
/// content always maps to the same names across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 20]);

impl Checksum {
    #[must_use]
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Sidecar form: both the raw bytes and the hex string.
impl Serialize for Checksum {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            bytes: &'a [u8],
            hex: String,
        }

        Repr {
            bytes: &self.0,
            hex: self.hex(),
        }
        .serialize(serializer)
    }
}

pub fn calculate_file_hash(path: &Path) -> io::Result<Checksum> {
    let file = File::open(path)?;
    calculate_hash(file)
}

pub fn calculate_hash(source: impl Read) -> io::Result<Checksum> {
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, source);
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let mut digest = [0u8; 20];
    digest.copy_from_slice(&hasher.finalize());
    Ok(Checksum(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            calculate_hash(&b""[..]).unwrap().hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            calculate_hash(&b"abc"[..]).unwrap().hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_calculate_file_hash() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"test content").unwrap();

        let hash = calculate_file_hash(temp_file.path()).unwrap();
        assert_eq!(hash.hex().len(), 40);
        assert_eq!(hash.to_string(), hash.hex());
    }

    #[test]
    fn test_same_content_same_hash() {
        let mut temp_file1 = NamedTempFile::new().unwrap();
        let mut temp_file2 = NamedTempFile::new().unwrap();

        temp_file1.write_all(b"identical content").unwrap();
        temp_file2.write_all(b"identical content").unwrap();

        let hash1 = calculate_file_hash(temp_file1.path()).unwrap();
        let hash2 = calculate_file_hash(temp_file2.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(
            calculate_file_hash(temp_file1.path()).unwrap(),
            hash1,
            "rehashing the same file must be stable"
        );
    }

    #[test]
    fn test_different_content_different_hash() {
        let mut temp_file1 = NamedTempFile::new().unwrap();
        let mut temp_file2 = NamedTempFile::new().unwrap();

        temp_file1.write_all(b"content A").unwrap();
        temp_file2.write_all(b"content B").unwrap();

        let hash1 = calculate_file_hash(temp_file1.path()).unwrap();
        let hash2 = calculate_file_hash(temp_file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_serializes_bytes_and_hex() {
        let checksum = calculate_hash(&b"abc"[..]).unwrap();
        let value = serde_json::to_value(checksum).unwrap();

        assert_eq!(value["hex"], "a9993e364706816aba3e25717850c26c9cd0d89d");
        let bytes = value["bytes"].as_array().unwrap();
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[0], 0xa9);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(calculate_file_hash(Path::new("/nonexistent/video.mp4")).is_err());
    }
}
