//! Saving and loading stamp files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tilestamp_core::ContentCatalog;

use crate::decode::decode_from;
use crate::encode::encode;
use crate::error::StoreError;
use crate::format::DEFAULT_EXTENSION;
use crate::structure::Structure;

/// `path` with [`DEFAULT_EXTENSION`] appended if it has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Encode `structure` and write it to `path`, replacing any existing file.
/// Returns the path actually written.
pub fn save<P: AsRef<Path>>(path: P, structure: &Structure) -> Result<PathBuf, StoreError> {
    let path = with_default_extension(path.as_ref());
    let bytes = encode(structure);
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    log::info!("saved {} byte stamp to {}", bytes.len(), path.display());
    Ok(path)
}

/// Read and decode the stamp at `path`.
///
/// The path is used as given; no extension is appended.
pub fn load<P: AsRef<Path>, C: ContentCatalog>(
    path: P,
    catalog: &C,
) -> Result<Structure, StoreError> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let structure = decode_from(&mut reader, catalog)?;
    log::debug!(
        "loaded {}x{} stamp from {}",
        structure.width(),
        structure.height(),
        path.display()
    );
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use std::fs;
    use tempfile::tempdir;
    use tilestamp_core::{Catalog, ContentKind, Point, Tile, TileAccess, TileWorld};

    #[test]
    fn default_extension_only_when_missing() {
        assert_eq!(
            with_default_extension(Path::new("vault")),
            PathBuf::from("vault.tstamp")
        );
        assert_eq!(
            with_default_extension(Path::new("vault.bin")),
            PathBuf::from("vault.bin")
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::new(10, 4);
        let bark = catalog.register(ContentKind::Tile, "orchard", "bark");
        let mut w = TileWorld::new(3, 2);
        w.set_tile(Point::new(1, 0), Tile::solid(bark).with_wall(2));
        w.set_tile(Point::new(2, 1), Tile::solid(5));
        let s = Structure::capture(&w, w.bounds(), &catalog);

        let path = save(dir.path().join("hut"), &s).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("tstamp"));
        assert_eq!(fs::read(&path).unwrap(), encode(&s));

        let loaded = load(&path, &catalog).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("nope.tstamp"), &Catalog::new(10, 4)).err();
        assert!(matches!(err, Some(StoreError::Io(_))));
    }

    #[test]
    fn load_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tstamp");
        fs::write(&path, [7, 0, 0]).unwrap();
        let err = load(&path, &Catalog::new(10, 4)).err();
        assert!(matches!(
            err,
            Some(StoreError::Decode(DecodeError::UnsupportedVersion(7)))
        ));
    }
}
