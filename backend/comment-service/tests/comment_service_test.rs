//! Handler tests for CommentService with mocked storage and video lookup

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mockall::mock;
use mockall::predicate::eq;
use tonic::{Code, Request, Status};
use uuid::Uuid;

use comment_service::clients::VideoLookup;
use comment_service::dao::{Comment, CommentDao, DaoError, DaoResult, NewComment};
use comment_service::grpc::comment_service_server::CommentService;
use comment_service::grpc::{
    CommentInfo, CommentServiceImpl, CreateCommentRequest, DeleteCommentByVideoIdRequest,
    DeleteCommentRequest, HealthzRequest, ListCommentRequest, UpdateCommentRequest,
};

const VIDEO_ID: &str = "65f1c0ffee0000000000beef";

mock! {
    pub CommentDao {}

    #[async_trait::async_trait]
    impl CommentDao for CommentDao {
        async fn list_by_video_id(&self, video_id: &str, limit: i64, offset: i64) -> DaoResult<Vec<Comment>>;
        async fn create(&self, comment: NewComment) -> DaoResult<Uuid>;
        async fn update(&self, id: Uuid, content: &str) -> DaoResult<Comment>;
        async fn delete(&self, id: Uuid) -> DaoResult<()>;
        async fn delete_by_video_id(&self, video_id: &str) -> DaoResult<u64>;
    }
}

mock! {
    pub VideoLookup {}

    #[async_trait::async_trait]
    impl VideoLookup for VideoLookup {
        async fn get_video(&self, video_id: &str, timeout: Option<Duration>) -> Result<(), Status>;
    }
}

const MALFORMED_UUIDS: [&str; 4] = ["", "42", "not-a-uuid", "0000-1111"];

fn unknown_error() -> DaoError {
    DaoError::Database("unknown mongo error".to_string())
}

fn fake_comment(id: Uuid, content: &str) -> Comment {
    let now = Utc::now();
    Comment {
        id,
        video_id: VIDEO_ID.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn service(dao: MockCommentDao, videos: MockVideoLookup) -> CommentServiceImpl {
    CommentServiceImpl::new(Arc::new(dao), Arc::new(videos))
}

fn untouched_dao() -> MockCommentDao {
    let mut dao = MockCommentDao::new();
    dao.expect_list_by_video_id().never();
    dao.expect_create().never();
    dao.expect_update().never();
    dao.expect_delete().never();
    dao.expect_delete_by_video_id().never();
    dao
}

#[tokio::test]
async fn healthz_reports_ok() {
    let svc = service(MockCommentDao::new(), MockVideoLookup::new());

    let resp = svc.healthz(Request::new(HealthzRequest {})).await.unwrap();
    assert_eq!(resp.into_inner().status, "ok");
}

#[tokio::test]
async fn list_comment_forwards_paging() {
    let comments = vec![fake_comment(Uuid::new_v4(), "b"), fake_comment(Uuid::new_v4(), "a")];
    let expected: Vec<CommentInfo> = comments.iter().cloned().map(CommentInfo::from).collect();

    let mut dao = MockCommentDao::new();
    dao.expect_list_by_video_id()
        .withf(|video_id, limit, offset| video_id == VIDEO_ID && *limit == 10 && *offset == 5)
        .times(1)
        .returning(move |_, _, _| Ok(comments.clone()));

    let resp = service(dao, MockVideoLookup::new())
        .list_comment(Request::new(ListCommentRequest {
            video_id: VIDEO_ID.to_string(),
            limit: 10,
            offset: 5,
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.comments, expected);
}

#[tokio::test]
async fn list_comment_passes_through_error() {
    let mut dao = MockCommentDao::new();
    dao.expect_list_by_video_id()
        .returning(|_, _, _| Err(unknown_error()));

    let status = service(dao, MockVideoLookup::new())
        .list_comment(Request::new(ListCommentRequest {
            video_id: VIDEO_ID.to_string(),
            ..Default::default()
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().contains("unknown mongo error"));
}

#[tokio::test]
async fn create_comment_returns_dao_id() {
    let id = Uuid::new_v4();

    let mut videos = MockVideoLookup::new();
    videos
        .expect_get_video()
        .withf(|video_id, timeout| video_id == VIDEO_ID && timeout.is_none())
        .times(1)
        .returning(|_, _| Ok(()));

    let mut dao = MockCommentDao::new();
    dao.expect_create()
        .withf(|c| c.video_id == VIDEO_ID && c.content == "great video")
        .times(1)
        .returning(move |_| Ok(id));

    let resp = service(dao, videos)
        .create_comment(Request::new(CreateCommentRequest {
            video_id: VIDEO_ID.to_string(),
            content: "great video".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.id, id.to_string());
}

#[tokio::test]
async fn create_comment_forwards_caller_deadline() {
    let mut videos = MockVideoLookup::new();
    videos
        .expect_get_video()
        .withf(|video_id, timeout| {
            video_id == VIDEO_ID && *timeout == Some(Duration::from_millis(1500))
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let mut dao = MockCommentDao::new();
    dao.expect_create().returning(|_| Ok(Uuid::new_v4()));

    let mut request = Request::new(CreateCommentRequest {
        video_id: VIDEO_ID.to_string(),
        content: "hello".to_string(),
    });
    request
        .metadata_mut()
        .insert("grpc-timeout", "1500m".parse().unwrap());

    assert!(service(dao, videos).create_comment(request).await.is_ok());
}

#[tokio::test]
async fn create_comment_fails_without_persisting_when_lookup_fails() {
    for status in [
        Status::not_found("video not found"),
        Status::unavailable("connection refused"),
        Status::deadline_exceeded("timeout"),
    ] {
        let code = status.code();
        let message = status.message().to_string();

        let mut videos = MockVideoLookup::new();
        videos
            .expect_get_video()
            .times(1)
            .returning(move |_, _| Err(status.clone()));

        let mut dao = MockCommentDao::new();
        dao.expect_create().never();

        let err = service(dao, videos)
            .create_comment(Request::new(CreateCommentRequest {
                video_id: VIDEO_ID.to_string(),
                content: "hello".to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code(), code);
        assert_eq!(err.message(), message);
    }
}

#[tokio::test]
async fn create_comment_rejects_malformed_video_id() {
    let mut videos = MockVideoLookup::new();
    videos.expect_get_video().never();

    let status = service(untouched_dao(), videos)
        .create_comment(Request::new(CreateCommentRequest {
            video_id: "video-1".to_string(),
            content: "hello".to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "invalid video ID");
}

#[tokio::test]
async fn create_comment_passes_through_dao_error() {
    let mut videos = MockVideoLookup::new();
    videos.expect_get_video().returning(|_, _| Ok(()));

    let mut dao = MockCommentDao::new();
    dao.expect_create().returning(|_| Err(unknown_error()));

    let status = service(dao, videos)
        .create_comment(Request::new(CreateCommentRequest {
            video_id: VIDEO_ID.to_string(),
            content: "hello".to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
}

#[tokio::test]
async fn update_comment_returns_stored_comment() {
    let id = Uuid::new_v4();
    let stored = fake_comment(id, "edited");
    let expected = CommentInfo::from(stored.clone());

    let mut dao = MockCommentDao::new();
    dao.expect_update()
        .withf(move |got, content| *got == id && content == "edited")
        .times(1)
        .returning(move |_, _| Ok(stored.clone()));

    let resp = service(dao, MockVideoLookup::new())
        .update_comment(Request::new(UpdateCommentRequest {
            id: id.to_string(),
            content: "edited".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(resp.comment, Some(expected));
}

#[tokio::test]
async fn update_comment_not_found() {
    let mut dao = MockCommentDao::new();
    dao.expect_update().returning(|_, _| Err(DaoError::NotFound));

    let status = service(dao, MockVideoLookup::new())
        .update_comment(Request::new(UpdateCommentRequest {
            id: Uuid::new_v4().to_string(),
            content: "edited".to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "comment not found");
}

#[tokio::test]
async fn delete_comment_success() {
    let id = Uuid::new_v4();
    let mut dao = MockCommentDao::new();
    dao.expect_delete().with(eq(id)).times(1).returning(|_| Ok(()));

    let result = service(dao, MockVideoLookup::new())
        .delete_comment(Request::new(DeleteCommentRequest { id: id.to_string() }))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn delete_comment_not_found() {
    let mut dao = MockCommentDao::new();
    dao.expect_delete().returning(|_| Err(DaoError::NotFound));

    let status = service(dao, MockVideoLookup::new())
        .delete_comment(Request::new(DeleteCommentRequest {
            id: Uuid::new_v4().to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "comment not found");
}

#[tokio::test]
async fn delete_comment_passes_through_unknown_error() {
    let mut dao = MockCommentDao::new();
    dao.expect_delete().returning(|_| Err(unknown_error()));

    let status = service(dao, MockVideoLookup::new())
        .delete_comment(Request::new(DeleteCommentRequest {
            id: Uuid::new_v4().to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().contains("unknown mongo error"));
}

#[tokio::test]
async fn malformed_ids_never_reach_storage() {
    for bad in MALFORMED_UUIDS {
        let svc = service(untouched_dao(), MockVideoLookup::new());

        let status = svc
            .update_comment(Request::new(UpdateCommentRequest {
                id: bad.to_string(),
                content: "x".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument, "update {:?}", bad);
        assert_eq!(status.message(), "invalid UUID");

        let status = svc
            .delete_comment(Request::new(DeleteCommentRequest { id: bad.to_string() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument, "delete {:?}", bad);
        assert_eq!(status.message(), "invalid UUID");
    }
}

#[tokio::test]
async fn delete_by_video_id_succeeds_with_no_matches() {
    let mut dao = MockCommentDao::new();
    dao.expect_delete_by_video_id()
        .withf(|video_id| video_id == VIDEO_ID)
        .times(1)
        .returning(|_| Ok(0));

    let result = service(dao, MockVideoLookup::new())
        .delete_comment_by_video_id(Request::new(DeleteCommentByVideoIdRequest {
            video_id: VIDEO_ID.to_string(),
        }))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn delete_by_video_id_validates_and_passes_through() {
    let status = service(untouched_dao(), MockVideoLookup::new())
        .delete_comment_by_video_id(Request::new(DeleteCommentByVideoIdRequest {
            video_id: "nope".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let mut dao = MockCommentDao::new();
    dao.expect_delete_by_video_id()
        .returning(|_| Err(unknown_error()));

    let status = service(dao, MockVideoLookup::new())
        .delete_comment_by_video_id(Request::new(DeleteCommentByVideoIdRequest {
            video_id: VIDEO_ID.to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);
}
