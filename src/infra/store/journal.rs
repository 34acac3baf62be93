//! File-backed reservation store using append-only JSON lines journals.
//!
//! Every committed insert or delete is appended as one line before it becomes
//! visible in memory. Each event writes to its own file,
//! `<path>/<stream>/event-<id>.jsonl`, so a slow disk sync on one event never
//! holds up admissions for another. Opening the store replays every journal,
//! so reservations and the id counter survive restarts.

use std::collections::HashMap;
use std::fs::{create_dir_all, read_dir, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::core::model::{EventId, Reservation, ReservationId, UserId};
use crate::core::{ReservationStore, StoreError};
use crate::infra::store::memory::InMemoryReservationStore;

const FILE_PREFIX: &str = "event-";
const FILE_SUFFIX: &str = ".jsonl";

/// One committed change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum JournalRecord {
    Insert { reservation: Reservation },
    Delete { id: ReservationId },
}

/// Writable end of one event's journal.
pub(crate) trait JournalFile: Write + Send {
    /// Force written bytes to stable storage.
    fn sync(&mut self) -> io::Result<()>;
    /// Cut the file back to `len` bytes.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl JournalFile for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Wraps the freshly opened file of an event before it is used for appends.
pub(crate) type TailOpener = Box<dyn Fn(EventId, File) -> Box<dyn JournalFile> + Send + Sync>;

/// Append position of one event's journal.
struct JournalTail {
    file: Box<dyn JournalFile>,
    /// Length of the durable, newline-terminated prefix.
    len: u64,
    /// Set when a failed append could not be cut back off the file.
    poisoned: bool,
}

impl JournalTail {
    /// Append one record line. On failure the file is cut back to its last
    /// committed length, so a rejected write never replays as a row.
    fn append(&mut self, line: &str) -> io::Result<()> {
        if self.poisoned {
            return Err(io::Error::other(
                "journal holds an unrecoverable partial write",
            ));
        }
        let entry = format!("{line}\n");
        let written = self
            .file
            .write_all(entry.as_bytes())
            .and_then(|()| self.file.flush())
            .and_then(|()| self.file.sync());
        match written {
            Ok(()) => {
                self.len += entry.len() as u64;
                Ok(())
            }
            Err(err) => {
                if let Err(rollback) = self
                    .file
                    .truncate(self.len)
                    .and_then(|()| self.file.sync())
                {
                    tracing::error!(
                        "failed to roll back journal to {} bytes: {}",
                        self.len,
                        rollback
                    );
                    self.poisoned = true;
                }
                Err(err)
            }
        }
    }
}

/// Durable reservation store.
///
/// Admission rules and per-event locking are those of
/// [`InMemoryReservationStore`]; the journal append happens inside the
/// event's critical section, so a failed write leaves no row behind. Each
/// event's journal has its own tail, taken only under that event's lock.
pub struct JournalReservationStore {
    dir: PathBuf,
    state: InMemoryReservationStore,
    tails: RwLock<HashMap<EventId, Arc<Mutex<JournalTail>>>>,
    opener: TailOpener,
}

impl JournalReservationStore {
    /// Open (or create) the journals under `<path>/<stream>/` and replay them.
    pub fn open(path: impl AsRef<Path>, stream: impl Into<String>) -> Result<Self, StoreError> {
        Self::open_with(
            path,
            stream,
            Box::new(|_: EventId, file: File| -> Box<dyn JournalFile> { Box::new(file) }),
        )
    }

    pub(crate) fn open_with(
        path: impl AsRef<Path>,
        stream: impl Into<String>,
        opener: TailOpener,
    ) -> Result<Self, StoreError> {
        let dir = path.as_ref().join(stream.into());
        create_dir_all(&dir).map_err(unavailable)?;

        let state = InMemoryReservationStore::new();
        let mut records = 0;
        let mut files = 0;
        for entry in read_dir(&dir).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            let Some(event_id) = parse_event_file(&entry.file_name().to_string_lossy()) else {
                continue;
            };
            records += replay(&entry.path(), event_id, &state)?;
            files += 1;
        }

        tracing::info!(
            "opened reservation journals in {} ({} files, {} records, {} live reservations)",
            dir.display(),
            files,
            records,
            state.len()
        );
        Ok(Self {
            dir,
            state,
            tails: RwLock::new(HashMap::new()),
            opener,
        })
    }

    /// Directory holding the per-event journals.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the journal file for `event_id`.
    pub fn event_file(&self, event_id: EventId) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{event_id}{FILE_SUFFIX}"))
    }

    fn tail(&self, event_id: EventId) -> Result<Arc<Mutex<JournalTail>>, StoreError> {
        if let Some(tail) = self.tails.read().get(&event_id) {
            return Ok(Arc::clone(tail));
        }
        let mut tails = self.tails.write();
        if let Some(tail) = tails.get(&event_id) {
            return Ok(Arc::clone(tail));
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.event_file(event_id))
            .map_err(unavailable)?;
        let len = file.metadata().map_err(unavailable)?.len();
        let tail = Arc::new(Mutex::new(JournalTail {
            file: (self.opener)(event_id, file),
            len,
            poisoned: false,
        }));
        tails.insert(event_id, Arc::clone(&tail));
        Ok(tail)
    }

    fn append(&self, event_id: EventId, record: &JournalRecord) -> Result<(), StoreError> {
        let line = serde_json::to_string(record).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let tail = self.tail(event_id)?;
        let mut tail = tail.lock();
        tail.append(&line).map_err(unavailable)
    }
}

fn unavailable(err: io::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn parse_event_file(name: &str) -> Option<EventId> {
    name.strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()
}

/// Replay one event's journal into `state`.
///
/// Only newline-terminated lines are committed. An unterminated final
/// segment is a write that never completed and is cut off the file; a
/// malformed terminated line is corruption.
fn replay(
    file_path: &Path,
    event_id: EventId,
    state: &InMemoryReservationStore,
) -> Result<usize, StoreError> {
    let bytes = std::fs::read(file_path).map_err(unavailable)?;
    let mut records = 0;
    let mut offset = 0;
    while let Some(end) = bytes[offset..].iter().position(|b| *b == b'\n') {
        let line = &bytes[offset..offset + end];
        offset += end + 1;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let record: JournalRecord = serde_json::from_slice(line).map_err(|e| {
            StoreError::Corrupt(format!("{}: {e}", file_path.display()))
        })?;
        match record {
            JournalRecord::Insert { reservation } => {
                if reservation.event_id != event_id {
                    return Err(StoreError::Corrupt(format!(
                        "{}: reservation {} belongs to event {}",
                        file_path.display(),
                        reservation.id,
                        reservation.event_id
                    )));
                }
                state.restore(reservation)?;
            }
            JournalRecord::Delete { id } => {
                state.forget(id);
                state.bump_next_id(id)?;
            }
        }
        records += 1;
    }

    if offset < bytes.len() {
        tracing::warn!(
            "dropping {} bytes of incomplete write at the end of {}",
            bytes.len() - offset,
            file_path.display()
        );
        let file = OpenOptions::new()
            .write(true)
            .open(file_path)
            .map_err(unavailable)?;
        file.set_len(offset as u64)
            .and_then(|()| file.sync_data())
            .map_err(unavailable)?;
    }
    Ok(records)
}

impl ReservationStore for JournalReservationStore {
    fn count_for_event(&self, event_id: EventId) -> Result<u32, StoreError> {
        self.state.count_for_event(event_id)
    }

    fn exists_pair(&self, event_id: EventId, user_id: UserId) -> Result<bool, StoreError> {
        self.state.exists_pair(event_id, user_id)
    }

    fn insert(&self, event_id: EventId, user_id: UserId) -> Result<Reservation, StoreError> {
        self.state.insert_guarded(event_id, user_id, None, |r| {
            self.append(event_id, &JournalRecord::Insert { reservation: *r })
        })
    }

    fn insert_within_capacity(
        &self,
        event_id: EventId,
        user_id: UserId,
        max_participants: u32,
    ) -> Result<Reservation, StoreError> {
        self.state
            .insert_guarded(event_id, user_id, Some(max_participants), |r| {
                self.append(event_id, &JournalRecord::Insert { reservation: *r })
            })
    }

    fn delete_by_id(&self, id: ReservationId) -> Result<bool, StoreError> {
        self.state.delete_guarded(id, |r| {
            self.append(r.event_id, &JournalRecord::Delete { id: r.id })
        })
    }

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        self.state.get(id)
    }

    fn list_for_event(&self, event_id: EventId) -> Result<Vec<Reservation>, StoreError> {
        self.state.list_for_event(event_id)
    }
}
