//! Input intake: single scripts, directories and zip archives
//!
//! Archives are unpacked into a temporary directory that lives only for the
//! duration of the call. Files that are not valid UTF-8 are reported in
//! [`Intake::rejected`] and do not stop the rest of the batch.

use crate::error::{Result, StoryError};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Script extensions accepted as job files
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["sql", "bteq", "plsql", "txt"];

/// One decoded job script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name relative to the input root, used to derive the job name
    pub name: String,
    pub content: String,
}

/// A file that was found but could not be used
#[derive(Debug)]
pub struct RejectedFile {
    pub name: String,
    pub error: StoryError,
}

/// Result of reading one input
#[derive(Debug, Default)]
pub struct Intake {
    pub sources: Vec<SourceFile>,
    pub rejected: Vec<RejectedFile>,
}

/// Whether a path has one of the supported script extensions
pub fn is_supported(path: &Path) -> bool {
    has_extension(path, &SUPPORTED_EXTENSIONS)
}

fn is_archive(path: &Path) -> bool {
    has_extension(path, &["zip"])
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Load job scripts from a file, directory or zip archive
pub fn load(path: &Path) -> Result<Intake> {
    if path.is_dir() {
        load_directory(path)
    } else if is_archive(path) {
        let file = File::open(path).map_err(|e| StoryError::io(path, e))?;
        load_archive(file, path)
    } else if is_supported(path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content = read_text(path)?;
        info!("Loaded {}", name);
        Ok(Intake { sources: vec![SourceFile { name, content }], rejected: Vec::new() })
    } else {
        Err(StoryError::UnsupportedInput {
            path: path.to_path_buf(),
            expected: SUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Unpack a zip archive into a scratch directory and load the scripts inside
///
/// `label` names the archive in errors and logs. Entries that cannot be
/// unpacked, including names that would land outside the scratch directory,
/// are rejected one by one; the other entries are still loaded.
pub fn load_archive<R: Read + Seek>(reader: R, label: &Path) -> Result<Intake> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| StoryError::archive(label, e.to_string()))?;

    let scratch = tempfile::Builder::new()
        .prefix("egress-story-")
        .tempdir()
        .map_err(|e| StoryError::io(std::env::temp_dir(), e))?;
    debug!("Extracting {} entries to {}", archive.len(), scratch.path().display());

    let mut rejected = Vec::new();
    for index in 0..archive.len() {
        if let Err(file) = unpack_entry(&mut archive, index, scratch.path(), label) {
            warn!("Rejected {}: {}", file.name, file.error);
            rejected.push(file);
        }
    }

    let intake = load_directory(scratch.path()).map(|mut intake| {
        rejected.append(&mut intake.rejected);
        intake.rejected = rejected;
        intake
    });
    release(scratch);
    intake
}

fn unpack_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    root: &Path,
    label: &Path,
) -> std::result::Result<(), RejectedFile> {
    let mut entry = archive.by_index(index).map_err(|e| RejectedFile {
        name: format!("#{}", index),
        error: StoryError::archive(label, e.to_string()),
    })?;
    let name = entry.name().to_string();

    let Some(relative) = entry.enclosed_name() else {
        return Err(RejectedFile { error: StoryError::unsafe_entry(label, &name), name });
    };
    let target = root.join(relative);

    if entry.is_dir() {
        return std::fs::create_dir_all(&target)
            .map_err(|e| RejectedFile { name, error: StoryError::io(&target, e) });
    }

    let written = target
        .parent()
        .map_or(Ok(()), |dir| std::fs::create_dir_all(dir))
        .and_then(|_| File::create(&target))
        .and_then(|mut out| std::io::copy(&mut entry, &mut out));

    match written {
        Ok(_) => Ok(()),
        Err(e) => Err(RejectedFile { name, error: StoryError::io(&target, e) }),
    }
}

fn release(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!("Failed to remove scratch directory {}: {}", path.display(), e);
    }
}

/// Walk a directory tree and load every supported script, in file-name order
pub fn load_directory(root: &Path) -> Result<Intake> {
    if !root.is_dir() {
        return Err(StoryError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut intake = Intake::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_supported(path) {
            continue;
        }

        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        match read_text(path) {
            Ok(content) => {
                debug!("Loaded {}", name);
                intake.sources.push(SourceFile { name, content });
            }
            Err(error) => {
                warn!("Rejected {}: {}", name, error);
                intake.rejected.push(RejectedFile { name, error });
            }
        }
    }

    info!(
        "Loaded {} job files from {} ({} rejected)",
        intake.sources.len(),
        root.display(),
        intake.rejected.len()
    );
    Ok(intake)
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| StoryError::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| StoryError::decode(path, e.utf8_error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::path::PathBuf;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a.sql")));
        assert!(is_supported(Path::new("dir/B.BTEQ")));
        assert!(is_supported(Path::new("c.PlSql")));
        assert!(is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("archive.zip")));
        assert!(!is_supported(Path::new("script.py")));
        assert!(!is_supported(Path::new("Makefile")));
    }

    #[test]
    fn test_load_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("egress_job_07.sql");
        std::fs::write(&path, "SELECT a FROM t").unwrap();

        let intake = load(&path).unwrap();
        assert_eq!(
            intake.sources,
            vec![SourceFile {
                name: "egress_job_07.sql".to_string(),
                content: "SELECT a FROM t".to_string()
            }]
        );
        assert!(intake.rejected.is_empty());
    }

    #[test]
    fn test_load_single_file_not_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.sql");
        std::fs::write(&path, b"SELECT caf\xe9 FROM t").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoryError::Decode { .. }));
    }

    #[test]
    fn test_load_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("job.py");
        std::fs::write(&path, "print(1)").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoryError::UnsupportedInput { .. }));
        assert!(err.to_string().contains(".sql, .bteq, .plsql, .txt"));
    }

    #[test]
    fn test_load_archive_filters_and_orders() {
        let bytes = build_zip(&[
            ("jobs/z_last.sql", b"SELECT z FROM tz".as_slice()),
            ("jobs/a_first.BTEQ", b"SELECT a FROM ta".as_slice()),
            ("jobs/readme.md", b"# not a job".as_slice()),
            ("m_middle.txt", b"SELECT m FROM tm".as_slice()),
        ]);

        let intake = load_archive(Cursor::new(bytes), Path::new("upload.zip")).unwrap();
        let names: Vec<PathBuf> = intake.sources.iter().map(|s| PathBuf::from(&s.name)).collect();

        assert_eq!(
            names,
            vec![
                Path::new("jobs").join("a_first.BTEQ"),
                Path::new("jobs").join("z_last.sql"),
                PathBuf::from("m_middle.txt"),
            ]
        );
        assert_eq!(intake.sources[0].content, "SELECT a FROM ta");
        assert!(intake.rejected.is_empty());
    }

    #[test]
    fn test_load_archive_rejects_undecodable() {
        let bytes = build_zip(&[
            ("good.sql", b"SELECT a FROM t".as_slice()),
            ("bad.sql", b"\xff\xfe\x00S\x00E".as_slice()),
        ]);

        let intake = load_archive(Cursor::new(bytes), Path::new("upload.zip")).unwrap();
        assert_eq!(intake.sources.len(), 1);
        assert_eq!(intake.sources[0].name, "good.sql");
        assert_eq!(intake.rejected.len(), 1);
        assert_eq!(intake.rejected[0].name, "bad.sql");
        assert!(intake.rejected[0].error.is_per_file());
    }

    #[test]
    fn test_load_archive_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.ZIP");
        std::fs::write(&path, build_zip(&[("one.plsql", b"SELECT 1 FROM dual".as_slice())])).unwrap();

        let intake = load(&path).unwrap();
        assert_eq!(intake.sources.len(), 1);
        assert_eq!(intake.sources[0].name, "one.plsql");
    }

    #[test]
    fn test_load_corrupt_archive() {
        let err = load_archive(Cursor::new(b"not a zip".to_vec()), Path::new("x.zip")).unwrap_err();
        assert!(matches!(err, StoryError::Archive { .. }));
    }

    #[test]
    fn test_load_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("nested")).unwrap();
        std::fs::write(temp_dir.path().join("nested/b.sql"), "SELECT b FROM tb").unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "SELECT a FROM ta").unwrap();
        std::fs::write(temp_dir.path().join("skip.csv"), "a,b").unwrap();

        let intake = load(temp_dir.path()).unwrap();
        let contents: Vec<&str> = intake.sources.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["SELECT a FROM ta", "SELECT b FROM tb"]);
    }

    #[test]
    fn test_empty_archive() {
        let bytes = build_zip(&[]);
        let intake = load_archive(Cursor::new(bytes), Path::new("empty.zip")).unwrap();
        assert!(intake.sources.is_empty());
        assert!(intake.rejected.is_empty());
    }

    #[test]
    fn test_load_archive_skips_escaping_entry() {
        let bytes = build_zip(&[
            ("good.sql", b"SELECT a FROM t".as_slice()),
            ("../evil.sql", b"SELECT secret FROM vault".as_slice()),
        ]);

        let intake = load_archive(Cursor::new(bytes), Path::new("upload.zip")).unwrap();
        assert_eq!(intake.sources.len(), 1);
        assert_eq!(intake.sources[0].name, "good.sql");
        assert_eq!(intake.sources[0].content, "SELECT a FROM t");

        assert_eq!(intake.rejected.len(), 1);
        assert_eq!(intake.rejected[0].name, "../evil.sql");
        assert!(matches!(intake.rejected[0].error, StoryError::UnsafeEntry { .. }));
        assert!(intake.rejected[0].error.is_per_file());
    }
}
