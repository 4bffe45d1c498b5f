use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use tracing::debug;

use super::{DaoError, DaoResult, Video, VideoDao};

/// MongoDB-backed [`VideoDao`]
#[derive(Clone)]
pub struct MongoVideoDao {
    collection: Collection<Video>,
}

impl MongoVideoDao {
    pub const COLLECTION: &'static str = "videos";

    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(Self::COLLECTION),
        }
    }
}

pub(crate) fn list_options(limit: i64, skip: i64) -> FindOptions {
    let mut options = FindOptions::default();
    options.sort = Some(doc! { "created_at": -1, "_id": -1 });
    options.skip = (skip > 0).then_some(skip as u64);
    options.limit = (limit > 0).then_some(limit);
    options
}

#[async_trait]
impl VideoDao for MongoVideoDao {
    async fn get(&self, id: ObjectId) -> DaoResult<Video> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or(DaoError::NotFound)
    }

    async fn list(&self, limit: i64, skip: i64) -> DaoResult<Vec<Video>> {
        let cursor = self
            .collection
            .find(None, list_options(limit, skip))
            .await?;

        let videos: Vec<Video> = cursor.try_collect().await?;
        debug!(count = videos.len(), limit, skip, "Listed videos");
        Ok(videos)
    }

    async fn delete(&self, id: ObjectId) -> DaoResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;

        if result.deleted_count == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
