//! Directory loader for proposal export corpora.
//!
//! A corpus is a flat directory of `*.json` files, one per proposal. Files
//! are loaded in sorted path order so the pipeline's input order (which the
//! graph builder's edge resolution depends on) is deterministic across
//! platforms and filesystem implementations.
//!
//! The corpus is machine-generated: an unreadable or unparseable file means
//! a broken export, so those are hard errors with path context. A file that
//! parses but carries no resolvable identifier is policy-skipped instead.

use crate::{resolve_records, ProposalRecord, RawRecord};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read corpus directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load every `*.json` file under `dir` and resolve identifiers.
pub fn load_dir(dir: &Path) -> Result<Vec<ProposalRecord>, LoadError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut raws = Vec::with_capacity(paths.len());
    for path in paths {
        raws.push(load_file(&path)?);
    }

    let records = resolve_records(raws);
    tracing::info!(count = records.len(), dir = %dir.display(), "loaded proposal corpus");
    Ok(records)
}

fn load_file(path: &Path) -> Result<RawRecord, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_record(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_load_dir_sorted_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_record(
            tmp.path(),
            "bip-0141.json",
            r#"{ "raw": { "preamble": { "bip": "141" } } }"#,
        );
        write_record(
            tmp.path(),
            "bip-0009.json",
            r#"{ "raw": { "preamble": { "bip": "9" } } }"#,
        );
        write_record(tmp.path(), "README.txt", "not a record");

        let records = load_dir(tmp.path()).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "141"]);
    }

    #[test]
    fn test_load_dir_skips_records_without_id() {
        let tmp = tempfile::tempdir().unwrap();
        write_record(
            tmp.path(),
            "a.json",
            r#"{ "raw": { "preamble": { "title": "orphan" } } }"#,
        );
        write_record(
            tmp.path(),
            "b.json",
            r#"{ "raw": { "preamble": { "bip": 2 } } }"#,
        );

        let records = load_dir(tmp.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "2");
    }

    #[test]
    fn test_load_dir_rejects_malformed_json() {
        let tmp = tempfile::tempdir().unwrap();
        write_record(tmp.path(), "bad.json", "{ not json");

        let err = load_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
