use crate::codec::CodecError;
use crate::placement::PlacedObject;
use crate::snapshot::{JournalSnapshot, Shard, ShardId, Talisman, JOURNAL_VERSION};
use crate::user_id::UserId;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("journal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("journal version {found} is not supported (expected {expected})")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Where committed talismans go. Listing order is newest first.
pub trait Journal {
    fn save(
        &mut self,
        user: &UserId,
        theme: &str,
        talisman: Talisman,
        objects: Vec<PlacedObject>,
    ) -> Result<Shard, JournalError>;

    fn list(&self, user: &UserId) -> Result<Vec<Shard>, JournalError>;
}

#[derive(Debug, Default)]
pub struct MemoryJournal {
    snapshot: JournalSnapshot,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: JournalSnapshot) -> Result<Self, JournalError> {
        if snapshot.version != JOURNAL_VERSION {
            return Err(JournalError::VersionMismatch {
                expected: JOURNAL_VERSION,
                found: snapshot.version,
            });
        }
        let next_id = snapshot
            .shards
            .iter()
            .map(|shard| shard.id.0 + 1)
            .max()
            .unwrap_or(1)
            .max(snapshot.next_id);
        Ok(Self {
            snapshot: JournalSnapshot { next_id, ..snapshot },
        })
    }

    pub fn snapshot(&self) -> &JournalSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.shards.is_empty()
    }
}

impl Journal for MemoryJournal {
    fn save(
        &mut self,
        user: &UserId,
        theme: &str,
        talisman: Talisman,
        objects: Vec<PlacedObject>,
    ) -> Result<Shard, JournalError> {
        let shard = Shard {
            id: ShardId(self.snapshot.next_id),
            user: user.clone(),
            theme: theme.to_string(),
            talisman,
            objects,
        };
        self.snapshot.next_id += 1;
        self.snapshot.shards.push(shard.clone());
        Ok(shard)
    }

    fn list(&self, user: &UserId) -> Result<Vec<Shard>, JournalError> {
        let mut shards: Vec<Shard> = self
            .snapshot
            .shards
            .iter()
            .filter(|shard| &shard.user == user)
            .cloned()
            .collect();
        shards.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(shards)
    }
}
