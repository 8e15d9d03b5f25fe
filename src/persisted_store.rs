use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sandplay_core::{
    decode, encode, Journal, JournalError, JournalSnapshot, MemoryJournal, PlacedObject, Shard,
    Talisman, UserId,
};

pub const JOURNAL_FILE_NAME: &str = "journal.v1.bin";
pub const JOURNAL_TEMP_FILE_NAME: &str = "journal.v1.bin.tmp";

/// A journal kept in a single rkyv file under `dir`. Every save rewrites the
/// file through a temporary sibling.
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    inner: MemoryJournal,
}

impl FileJournal {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, JournalError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(JOURNAL_FILE_NAME);
        let inner = match load_snapshot(&path)? {
            Some(snapshot) => MemoryJournal::from_snapshot(snapshot)?,
            None => MemoryJournal::new(),
        };
        tracing::debug!(path = %path.display(), shards = inner.len(), "journal opened");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Journal for FileJournal {
    fn save(
        &mut self,
        user: &UserId,
        theme: &str,
        talisman: Talisman,
        objects: Vec<PlacedObject>,
    ) -> Result<Shard, JournalError> {
        let mut next = MemoryJournal::from_snapshot(self.inner.snapshot().clone())?;
        let shard = next.save(user, theme, talisman, objects)?;
        store_snapshot(&self.path, next.snapshot())?;
        self.inner = next;
        Ok(shard)
    }

    fn list(&self, user: &UserId) -> Result<Vec<Shard>, JournalError> {
        self.inner.list(user)
    }
}

fn load_snapshot(path: &Path) -> Result<Option<JournalSnapshot>, JournalError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    match decode::<JournalSnapshot>(&bytes) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "journal file unreadable");
            Err(err.into())
        }
    }
}

fn store_snapshot(path: &Path, snapshot: &JournalSnapshot) -> Result<(), JournalError> {
    let bytes = encode(snapshot)?;
    let tmp = path.with_file_name(JOURNAL_TEMP_FILE_NAME);
    fs::write(&tmp, &bytes)?;
    if let Err(err) = fs::rename(&tmp, path) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            tracing::warn!(path = %tmp.display(), error = %cleanup, "stale journal temp file");
        }
        return Err(err.into());
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "journal written");
    Ok(())
}
