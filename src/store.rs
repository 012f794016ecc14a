//! Flat-file persistence for scraped listings.
//!
//! The whole collection lives in one JSON array, pretty-printed so the
//! file stays diffable. Every upsert is a full read-modify-write; the
//! tool runs as a single sequential process, so no locking is done.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::Listing;

/// Insert or update one listing in the JSON file at `path`, keyed by id.
///
/// An already-present listing is replaced in place, keeping its position
/// in the array; a new one is appended. The file is created if absent.
pub fn upsert(listing: &Listing, path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut listings = decode(&contents, path)?;

    match listings.iter_mut().find(|existing| existing.id == listing.id) {
        Some(existing) => *existing = listing.clone(),
        None => listings.push(listing.clone()),
    }

    let data = serde_json::to_string_pretty(&listings).map_err(|source| Error::Decode {
        context: format!("listing collection for {}", path.display()),
        source,
    })?;

    file.set_len(0).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    file.seek(SeekFrom::Start(0)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(data.as_bytes()).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Load the full stored collection from `path`.
pub fn load(path: &Path) -> Result<Vec<Listing>> {
    let mut file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode(&contents, path)
}

/// Shared decode path for upsert and load.
///
/// Only a zero-length file counts as an empty collection; any other
/// content (including lone whitespace) must decode as a JSON array.
fn decode(contents: &str, path: &Path) -> Result<Vec<Listing>> {
    if contents.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(contents).map_err(|source| Error::Decode {
        context: format!("listing collection in {}", path.display()),
        source,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn listing(id: u64, title: &str) -> Listing {
        Listing {
            id,
            title: title.to_string(),
            slug: format!("slug-{id}"),
            ..Default::default()
        }
    }

    #[test]
    fn creates_file_and_appends_new_listings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");

        upsert(&listing(1, "A"), &path).unwrap();
        upsert(&listing(2, "B"), &path).unwrap();

        let stored = load(&path).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, 1);
        assert_eq!(stored[1].id, 2);
    }

    #[test]
    fn upsert_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");

        upsert(&listing(1, "A"), &path).unwrap();
        let once = std::fs::read_to_string(&path).unwrap();

        upsert(&listing(1, "A"), &path).unwrap();
        let twice = std::fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn updated_listing_keeps_its_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");

        upsert(&listing(1, "A"), &path).unwrap();
        upsert(&listing(2, "B"), &path).unwrap();
        upsert(&listing(3, "C"), &path).unwrap();

        upsert(&listing(2, "B updated"), &path).unwrap();

        let stored = load(&path).unwrap();
        let ids: Vec<u64> = stored.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(stored[1].title, "B updated");
    }

    #[test]
    fn rewrite_shrinks_file_when_update_is_smaller() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");

        upsert(&listing(1, "a rather long title that pads the file"), &path).unwrap();
        upsert(&listing(1, "short"), &path).unwrap();

        let stored = load(&path).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "short");
    }

    #[test]
    fn whitespace_only_file_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");
        std::fs::write(&path, " ").unwrap();

        let err = upsert(&listing(1, "A"), &path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn non_array_content_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");
        std::fs::write(&path, "{\"id\": 1}").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn file_is_pretty_printed_with_two_space_indent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apartments.json");

        upsert(&listing(1, "A"), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n  {\n    \"id\": 1,"));
    }
}
