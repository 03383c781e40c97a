//! Append-only JSON-lines document store.
//!
//! Each collection is one `.jsonl` file under the data directory, mirroring
//! the collection path: `users/u1/givingRecords` lives at
//! `<data_dir>/users/u1/givingRecords.jsonl`. Documents are only ever
//! appended; queries read the whole file.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::storage::error::{StoreError, StoreResult};
use crate::backend::storage::rules::{AccessRules, Operation};
use crate::backend::storage::timestamps::{resolve_fields, ServerClock};
use crate::backend::storage::traits::{
    AuthContext, CollectionPath, Document, DocumentHandle, DocumentStore, Fields, Query,
    QuerySnapshot,
};

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    id: String,
    fields: Map<String, Value>,
}

#[derive(Clone)]
pub struct JsonFileDocumentStore {
    base_directory: PathBuf,
    clock: Arc<ServerClock>,
    rules: AccessRules,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileDocumentStore {
    /// Open a store rooted at `base_directory`, creating it if needed
    pub async fn open<P: AsRef<Path>>(base_directory: P) -> StoreResult<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        fs::create_dir_all(&base_directory).await?;
        info!("Document store data directory: {}", base_directory.display());

        Ok(Self {
            base_directory,
            clock: Arc::new(ServerClock::new()),
            rules: AccessRules,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File holding a collection's documents
    pub fn collection_file(&self, collection: &CollectionPath) -> PathBuf {
        let mut path = self.base_directory.clone();
        for segment in collection.segments() {
            path.push(segment);
        }
        path.set_extension("jsonl");
        path
    }

    async fn read_collection(&self, collection: &CollectionPath) -> StoreResult<Vec<Document>> {
        let file = self.collection_file(collection);
        let contents = match fs::read_to_string(&file).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let torn_tail = !contents.is_empty() && !contents.ends_with('\n');
        let lines: Vec<&str> = contents.lines().filter(|line| !line.trim().is_empty()).collect();
        let last_index = lines.len().saturating_sub(1);

        let mut documents = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            match serde_json::from_str::<StoredDocument>(line) {
                Ok(stored) => documents.push(Document {
                    id: stored.id,
                    fields: stored.fields,
                }),
                // An unterminated last line is a write that never finished
                Err(e) if torn_tail && index == last_index => {
                    warn!("Skipping torn write at end of {}: {}", file.display(), e);
                }
                Err(e) => {
                    return Err(StoreError::BackendUnavailable(format!(
                        "Corrupt line {} in {}: {}",
                        index + 1,
                        file.display(),
                        e
                    )));
                }
            }
        }
        Ok(documents)
    }

    /// Bring the file back to a line boundary before appending
    ///
    /// A complete but unterminated last document gets its newline; a partial
    /// one is truncated away.
    async fn repair_torn_tail(&self, file: &Path) -> StoreResult<()> {
        let mut handle = match OpenOptions::new().read(true).write(true).open(file).await {
            Ok(handle) => handle,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if handle.metadata().await?.len() == 0 {
            return Ok(());
        }

        let mut last_byte = [0u8; 1];
        handle.seek(SeekFrom::End(-1)).await?;
        handle.read_exact(&mut last_byte).await?;
        if last_byte[0] == b'\n' {
            return Ok(());
        }

        let mut contents = Vec::new();
        handle.seek(SeekFrom::Start(0)).await?;
        handle.read_to_end(&mut contents).await?;
        let tail_start = contents.iter().rposition(|b| *b == b'\n').map_or(0, |p| p + 1);

        if serde_json::from_slice::<StoredDocument>(&contents[tail_start..]).is_ok() {
            handle.seek(SeekFrom::End(0)).await?;
            handle.write_all(b"\n").await?;
            warn!("Terminated unfinished last line of {}", file.display());
        } else {
            handle.set_len(tail_start as u64).await?;
            warn!(
                "Dropped {} bytes of torn write at end of {}",
                contents.len() - tail_start,
                file.display()
            );
        }
        handle.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn add_document(
        &self,
        auth: &AuthContext,
        collection: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<DocumentHandle> {
        self.rules.check(auth, collection, Operation::Create)?;

        let file = self.collection_file(collection);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await?;
        }

        let id = Uuid::new_v4().to_string();
        let _guard = self.write_lock.lock().await;
        let stored = StoredDocument {
            id: id.clone(),
            fields: resolve_fields(fields, self.clock.next()),
        };
        let mut line = serde_json::to_string(&stored)
            .map_err(|e| StoreError::InvalidInput(e.to_string()))?;
        line.push('\n');

        self.repair_torn_tail(&file).await?;
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
            .await?;
        handle.write_all(line.as_bytes()).await?;
        handle.flush().await?;

        debug!("Appended document {} to {}", id, file.display());
        Ok(DocumentHandle {
            path: collection.document_path(&id),
            id,
        })
    }

    async fn run_query(&self, auth: &AuthContext, query: &Query) -> StoreResult<QuerySnapshot> {
        self.rules.check(auth, &query.collection, Operation::Read)?;
        let documents = self.read_collection(&query.collection).await?;
        Ok(QuerySnapshot::new(query.apply(documents)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::traits::{Direction, FieldValue};
    use tempfile::tempdir;

    fn records_path() -> CollectionPath {
        CollectionPath::parse("users/u1/givingRecords").unwrap()
    }

    fn fields(amount: f64) -> Fields {
        let mut fields = Fields::new();
        fields.insert("amount".to_string(), FieldValue::from(serde_json::json!(amount)));
        fields.insert("createdAt".to_string(), FieldValue::ServerTimestamp);
        fields
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let auth = AuthContext::user("u1");
        {
            let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
            store.add_document(&auth, &records_path(), fields(10.0)).await.unwrap();
            store.add_document(&auth, &records_path(), fields(20.0)).await.unwrap();
        }

        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let query = Query::collection(records_path()).order_by("createdAt", Direction::Descending);
        let amounts: Vec<f64> = store
            .run_query(&auth, &query)
            .await
            .unwrap()
            .map(|d| d.f64_field("amount").unwrap())
            .collect();
        assert_eq!(amounts, vec![20.0, 10.0]);
    }

    #[tokio::test]
    async fn test_collection_file_mirrors_path() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let file = store.collection_file(&records_path());
        assert_eq!(file, temp_dir.path().join("users").join("u1").join("givingRecords.jsonl"));

        store
            .add_document(&AuthContext::user("u1"), &records_path(), fields(5.0))
            .await
            .unwrap();
        let contents = std::fs::read_to_string(file).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_reads_as_empty() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let snapshot = store
            .run_query(&AuthContext::user("u1"), &Query::collection(records_path()))
            .await
            .unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_backend_unavailable() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let file = store.collection_file(&records_path());
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "not json\n").unwrap();

        let result = store
            .run_query(&AuthContext::user("u1"), &Query::collection(records_path()))
            .await;
        assert!(matches!(result, Err(StoreError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_append_after_torn_write_keeps_collection_readable() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let auth = AuthContext::user("u1");
        store.add_document(&auth, &records_path(), fields(10.0)).await.unwrap();

        // Simulate a crash partway through the next write
        let file = store.collection_file(&records_path());
        let mut contents = std::fs::read_to_string(&file).unwrap();
        contents.push_str("{\"id\":\"torn\",\"fie");
        std::fs::write(&file, contents).unwrap();

        let before_repair = store
            .run_query(&auth, &Query::collection(records_path()))
            .await
            .unwrap();
        assert_eq!(before_repair.len(), 1);

        let handle = store.add_document(&auth, &records_path(), fields(20.0)).await.unwrap();
        let ids: Vec<String> = store
            .run_query(&auth, &Query::collection(records_path()))
            .await
            .unwrap()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], handle.id);

        let contents = std::fs::read_to_string(&file).unwrap();
        assert!(!contents.contains("torn"));
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_complete_unterminated_line_is_kept() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let auth = AuthContext::user("u1");
        store.add_document(&auth, &records_path(), fields(10.0)).await.unwrap();

        let file = store.collection_file(&records_path());
        let contents = std::fs::read_to_string(&file).unwrap();
        std::fs::write(&file, contents.trim_end()).unwrap();

        store.add_document(&auth, &records_path(), fields(20.0)).await.unwrap();
        let snapshot = store
            .run_query(&auth, &Query::collection(records_path()))
            .await
            .unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn test_waitlist_is_write_only() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let waitlist = CollectionPath::parse("waitlist").unwrap();
        let mut entry = Fields::new();
        entry.insert("email".to_string(), FieldValue::from("a@b.com"));
        store.add_document(&AuthContext::anonymous(), &waitlist, entry).await.unwrap();

        let read = store
            .run_query(&AuthContext::anonymous(), &Query::collection(waitlist))
            .await;
        assert!(matches!(read, Err(StoreError::PermissionDenied(_))));
    }
}
