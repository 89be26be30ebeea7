use crate::domain::error::{PbiLinkError, PbiLinkResult};
use std::fs::File;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Extract the downloaded release archive into `dest`, overwriting any
/// existing contents.
pub fn unpack_archive(archive: &Path, dest: &Path) -> PbiLinkResult<()> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| PbiLinkError::Install {
        message: format!("unreadable archive {}: {}", archive.display(), e),
    })?;

    let entries = zip.len();
    zip.extract(dest).map_err(|e| PbiLinkError::Install {
        message: format!("failed to unpack into {}: {}", dest.display(), e),
    })?;

    debug!(entries, dest = %dest.display(), "archive unpacked");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_test_archive(path: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, contents) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_unpack_writes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tool.zip");
        write_test_archive(
            &archive,
            &[
                ("pbi-tools.exe", b"binary".as_slice()),
                ("docs/README.md", b"docs".as_slice()),
            ],
        );

        let dest = dir.path().join("install");
        unpack_archive(&archive, &dest).unwrap();

        assert_eq!(
            std::fs::read(dest.join("pbi-tools.exe")).unwrap(),
            b"binary"
        );
        assert_eq!(std::fs::read(dest.join("docs/README.md")).unwrap(), b"docs");
    }

    #[test]
    fn test_unpack_overwrites_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tool.zip");
        write_test_archive(&archive, &[("pbi-tools.exe", b"new".as_slice())]);

        let dest = dir.path().join("install");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("pbi-tools.exe"), b"stale").unwrap();

        unpack_archive(&archive, &dest).unwrap();
        assert_eq!(std::fs::read(dest.join("pbi-tools.exe")).unwrap(), b"new");
    }

    #[test]
    fn test_unpack_rejects_garbage_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("tool.zip");
        std::fs::write(&archive, b"this is not a zip file").unwrap();

        let err = unpack_archive(&archive, &dir.path().join("install")).unwrap_err();
        assert!(matches!(err, PbiLinkError::Install { .. }));
    }

    #[test]
    fn test_unpack_missing_archive_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = unpack_archive(&dir.path().join("absent.zip"), dir.path()).unwrap_err();
        assert!(matches!(err, PbiLinkError::Io(_)));
    }
}
