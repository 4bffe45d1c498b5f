use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use tracing::debug;
use uuid::Uuid;

use super::{Comment, CommentDao, DaoError, DaoResult, NewComment};

/// MongoDB-backed [`CommentDao`]
#[derive(Clone)]
pub struct MongoCommentDao {
    collection: Collection<Comment>,
}

impl MongoCommentDao {
    pub const COLLECTION: &'static str = "comments";

    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(Self::COLLECTION),
        }
    }

    /// Index backing list and bulk delete by video
    pub async fn ensure_indexes(&self) -> DaoResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "video_id": 1, "created_at": -1 })
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }
}

fn id_filter(id: Uuid) -> mongodb::bson::Document {
    doc! { "_id": uuid_bson(id) }
}

fn uuid_bson(id: Uuid) -> Bson {
    Bson::from(mongodb::bson::Uuid::from(id))
}

pub(crate) fn list_options(limit: i64, offset: i64) -> FindOptions {
    let mut options = FindOptions::default();
    options.sort = Some(doc! { "created_at": -1, "_id": -1 });
    options.skip = (offset > 0).then_some(offset as u64);
    options.limit = (limit > 0).then_some(limit);
    options
}

#[async_trait]
impl CommentDao for MongoCommentDao {
    async fn list_by_video_id(
        &self,
        video_id: &str,
        limit: i64,
        offset: i64,
    ) -> DaoResult<Vec<Comment>> {
        let cursor = self
            .collection
            .find(doc! { "video_id": video_id }, list_options(limit, offset))
            .await?;

        let comments: Vec<Comment> = cursor.try_collect().await?;
        debug!(video_id, count = comments.len(), "Listed comments");
        Ok(comments)
    }

    async fn create(&self, comment: NewComment) -> DaoResult<Uuid> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            video_id: comment.video_id,
            content: comment.content,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&comment, None).await?;
        Ok(comment.id)
    }

    async fn update(&self, id: Uuid, content: &str) -> DaoResult<Comment> {
        let mut options = FindOneAndUpdateOptions::default();
        options.return_document = Some(ReturnDocument::After);

        let update = doc! {
            "$set": {
                "content": content,
                "updated_at": BsonDateTime::from_chrono(Utc::now()),
            }
        };

        self.collection
            .find_one_and_update(id_filter(id), update, options)
            .await?
            .ok_or(DaoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<()> {
        let result = self.collection.delete_one(id_filter(id), None).await?;

        if result.deleted_count == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_video_id(&self, video_id: &str) -> DaoResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "video_id": video_id }, None)
            .await?;

        debug!(video_id, deleted = result.deleted_count, "Deleted comments by video");
        Ok(result.deleted_count)
    }
}
