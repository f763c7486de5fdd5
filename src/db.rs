use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::{
    Client, Collection, Database as MongoDatabase,
    bson::{DateTime, Document, doc, to_bson},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::data_models::{HistoryEntry, ToolRecord};
use crate::error::ToolResult;

/// Collection names as constants for consistency
pub mod collections {
    pub const HISTORY: &str = "history";
}

/// Main database wrapper providing connection management and collection access
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    db: MongoDatabase,
}

impl Database {
    /// Create a new Database instance with custom URI and database name.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        let client_options = ClientOptions::parse(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;

        let client =
            Client::with_options(client_options).context("Failed to create MongoDB client")?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .context("Failed to connect to MongoDB")?;

        log::info!("Connected to MongoDB database: {}", db_name);

        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Connect using `MONGO_URI`/`MONGO_DB_NAME`; `None` when no URI is configured.
    pub async fn from_config(config: &Config) -> Result<Option<Self>> {
        match &config.mongo_uri {
            Some(uri) => Ok(Some(Self::new(uri, &config.mongo_db_name).await?)),
            None => {
                log::warn!("MONGO_URI not set, tool results will not be persisted");
                Ok(None)
            }
        }
    }

    /// Get a typed collection by name
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.db.collection(name)
    }

    /// Get the underlying MongoDB client (for advanced operations)
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn history(&self) -> Collection<HistoryEntry> {
        self.collection(collections::HISTORY)
    }
}

// =============================================================================
// Generic operations
// =============================================================================

pub struct Repository<T>
where
    T: Send + Sync,
{
    collection: Collection<T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }

    /// Find a single document matching a filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.collection
            .find_one(filter)
            .await
            .context("Failed to find document")
    }

    /// `$set` the given fields on the document matching `filter`, creating it if absent.
    /// Fields not named in `fields` are left as they are.
    pub async fn merge_one(&self, filter: Document, fields: Document) -> Result<()> {
        self.collection
            .update_one(filter, doc! { "$set": fields })
            .upsert(true)
            .await
            .context("Failed to merge document")?;
        Ok(())
    }
}

// =============================================================================
// Tool result persistence
// =============================================================================

/// Where finished tool runs are recorded, keyed by user and session.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save_tool_result(
        &self,
        user_id: &str,
        session_id: &str,
        record: &ToolRecord,
    ) -> ToolResult<()>;
}

pub struct ToolResultRepo {
    repo: Repository<HistoryEntry>,
}

impl ToolResultRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            repo: Repository::new(db.history()),
        }
    }

    fn session_filter(user_id: &str, session_id: &str) -> Document {
        doc! { "user_id": user_id, "session_id": session_id }
    }

    pub async fn find(&self, user_id: &str, session_id: &str) -> Result<Option<HistoryEntry>> {
        self.repo
            .find_one(Self::session_filter(user_id, session_id))
            .await
    }
}

#[async_trait]
impl ResultStore for ToolResultRepo {
    async fn save_tool_result(
        &self,
        user_id: &str,
        session_id: &str,
        record: &ToolRecord,
    ) -> ToolResult<()> {
        let record = to_bson(record).context("Failed to serialize tool result")?;
        self.repo
            .merge_one(
                Self::session_filter(user_id, session_id),
                doc! { "tool_result": record, "updated_at": DateTime::now() },
            )
            .await?;
        log::info!("stored tool result for session {}", session_id);
        Ok(())
    }
}
