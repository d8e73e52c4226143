use super::helpers::{
    create_comment, create_post, expect_status, get_request_from, json_request_from, read_json,
    send, spawn_app, unique_ip, unique_slug,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use blog_api::{
    application::likes::service::LikeToggleService,
    domain::{
        errors::DomainError,
        like::{
            mark::LikeMark,
            store::{CounterDelta, LikeStore, LikeTransaction, MarkInsert},
            target::{LikeTarget, TargetKind},
        },
    },
    infrastructure::{
        database::pool::create_pool, repositories::sqlx_like_repository::SqlxLikeRepository,
    },
};
use futures_util::future::join_all;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Barrier;

async fn post_like_state(db: &PgPool, post_id: i64) -> (i32, i64) {
    let like_count: i32 = sqlx::query_scalar("SELECT like_count FROM posts WHERE id = $1")
        .bind(post_id as i32)
        .fetch_one(db)
        .await
        .expect("post row");
    let marks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
        .bind(post_id as i32)
        .fetch_one(db)
        .await
        .expect("mark count");
    (like_count, marks)
}

async fn comment_mark_count(db: &PgPool, comment_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1")
        .bind(comment_id as i32)
        .fetch_one(db)
        .await
        .expect("comment mark count")
}

fn delete_request(uri: String) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn toggle(app: &axum::Router, kind: &str, id: i64, ip: &str) -> bool {
    let req = json_request_from("POST", "/api/likes", ip, &json!({ "type": kind, "id": id }));
    let res = expect_status(send(app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    body["liked"].as_bool().expect("liked flag")
}

#[tokio::test]
async fn like_then_unlike_round_trip() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-round-trip"), &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let ip = unique_ip();

    assert!(toggle(&app.app, "post", post_id, &ip).await);
    assert_eq!(post_like_state(&app.db, post_id).await, (1, 1));

    let uri = format!("/api/likes?type=post&id={post_id}");
    let res = expect_status(send(&app.app, get_request_from(&uri, &ip)).await, StatusCode::OK).await;
    let status: Value = read_json(res).await;
    assert_eq!(status["liked"], true);

    assert!(!toggle(&app.app, "post", post_id, &ip).await);
    assert_eq!(post_like_state(&app.db, post_id).await, (0, 0));
}

#[tokio::test]
async fn two_requesters_are_counted_separately() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-two"), &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let (a, b) = (unique_ip(), unique_ip());

    toggle(&app.app, "post", post_id, &a).await;
    toggle(&app.app, "post", post_id, &b).await;
    assert_eq!(post_like_state(&app.db, post_id).await.0, 2);

    toggle(&app.app, "post", post_id, &a).await;
    assert_eq!(post_like_state(&app.db, post_id).await, (1, 1));
}

#[tokio::test]
async fn comment_likes_update_comment_counter() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-comment"), &[]).await;
    let comment = create_comment(&app.app, post["id"].as_i64().unwrap(), "likeable").await;
    let comment_id = comment["id"].as_i64().unwrap();

    assert!(toggle(&app.app, "comment", comment_id, &unique_ip()).await);

    let like_count: i32 = sqlx::query_scalar("SELECT like_count FROM comments WHERE id = $1")
        .bind(comment_id as i32)
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(like_count, 1);
}

#[tokio::test]
async fn deleting_post_cascades_its_likes() {
    let Some(app) = spawn_app().await else { return };
    let slug = unique_slug("likes-cascade");
    let post = create_post(&app.app, &slug, &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let ip = unique_ip();
    toggle(&app.app, "post", post_id, &ip).await;

    let res = send(&app.app, delete_request(format!("/api/posts/{slug}"))).await;
    expect_status(res, StatusCode::OK).await;

    let marks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
        .bind(post_id as i32)
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(marks, 0);

    let req = json_request_from("POST", "/api/likes", &ip, &json!({ "type": "post", "id": post_id }));
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn unlike_with_drifted_counter_stays_at_zero() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-floor"), &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let ip = unique_ip();
    toggle(&app.app, "post", post_id, &ip).await;

    sqlx::query("UPDATE posts SET like_count = 0 WHERE id = $1")
        .bind(post_id as i32)
        .execute(&app.db)
        .await
        .unwrap();

    assert!(!toggle(&app.app, "post", post_id, &ip).await);
    assert_eq!(post_like_state(&app.db, post_id).await, (0, 0));
}

#[tokio::test]
async fn concurrent_toggles_keep_counter_consistent() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-race"), &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let ip = unique_ip();

    let requests = (0..6).map(|_| {
        let req = json_request_from("POST", "/api/likes", &ip, &json!({ "type": "post", "id": post_id }));
        send(&app.app, req)
    });
    for res in join_all(requests).await {
        assert_eq!(res.status(), StatusCode::OK);
    }

    let (like_count, marks) = post_like_state(&app.db, post_id).await;
    assert!(marks <= 1);
    assert_eq!(i64::from(like_count), marks);
}

#[tokio::test]
async fn deleting_comment_cascades_its_likes() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-comment-cascade"), &[]).await;
    let comment = create_comment(&app.app, post["id"].as_i64().unwrap(), "doomed").await;
    let comment_id = comment["id"].as_i64().unwrap();
    let ip = unique_ip();
    toggle(&app.app, "comment", comment_id, &ip).await;
    toggle(&app.app, "comment", comment_id, &unique_ip()).await;
    assert_eq!(comment_mark_count(&app.db, comment_id).await, 2);

    let res = send(&app.app, delete_request(format!("/api/comments/{comment_id}"))).await;
    expect_status(res, StatusCode::OK).await;

    assert_eq!(comment_mark_count(&app.db, comment_id).await, 0);
    let req = json_request_from("POST", "/api/likes", &ip, &json!({ "type": "comment", "id": comment_id }));
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn deleting_post_cascades_through_comments_to_their_likes() {
    let Some(app) = spawn_app().await else { return };
    let slug = unique_slug("likes-nested-cascade");
    let post = create_post(&app.app, &slug, &[]).await;
    let comment = create_comment(&app.app, post["id"].as_i64().unwrap(), "nested").await;
    let comment_id = comment["id"].as_i64().unwrap();
    let ip = unique_ip();
    toggle(&app.app, "comment", comment_id, &ip).await;
    toggle(&app.app, "comment", comment_id, &unique_ip()).await;

    let res = send(&app.app, delete_request(format!("/api/posts/{slug}"))).await;
    expect_status(res, StatusCode::OK).await;

    assert_eq!(comment_mark_count(&app.db, comment_id).await, 0);
    let req = json_request_from("POST", "/api/likes", &ip, &json!({ "type": "comment", "id": comment_id }));
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}

/// Holds each transaction after its first mark lookup until every party has
/// made that lookup, so all of them act on the same starting state.
struct GatedStore {
    inner: SqlxLikeRepository,
    barrier: Arc<Barrier>,
}

struct GatedTransaction {
    inner: Box<dyn LikeTransaction>,
    barrier: Arc<Barrier>,
    gated: bool,
}

#[async_trait]
impl LikeStore for GatedStore {
    async fn begin(&self) -> Result<Box<dyn LikeTransaction>, DomainError> {
        Ok(Box::new(GatedTransaction {
            inner: self.inner.begin().await?,
            barrier: self.barrier.clone(),
            gated: false,
        }))
    }

    async fn has_mark(&self, target: LikeTarget, requester_ip: &str) -> Result<bool, DomainError> {
        self.inner.has_mark(target, requester_ip).await
    }
}

#[async_trait]
impl LikeTransaction for GatedTransaction {
    async fn target_exists(&mut self, target: LikeTarget) -> Result<bool, DomainError> {
        self.inner.target_exists(target).await
    }

    async fn find_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<Option<LikeMark>, DomainError> {
        let found = self.inner.find_mark(target, requester_ip).await?;
        if !self.gated {
            self.gated = true;
            self.barrier.wait().await;
        }
        Ok(found)
    }

    async fn insert_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<MarkInsert, DomainError> {
        self.inner.insert_mark(target, requester_ip).await
    }

    async fn delete_mark(&mut self, target: LikeTarget, mark_id: i32) -> Result<bool, DomainError> {
        self.inner.delete_mark(target, mark_id).await
    }

    async fn adjust_counter(
        &mut self,
        target: LikeTarget,
        delta: CounterDelta,
    ) -> Result<i32, DomainError> {
        self.inner.adjust_counter(target, delta).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.inner.commit().await
    }
}

const RACE_PARTIES: usize = 8;

/// Runs `RACE_PARTIES` toggles for one requester at once, each holding its
/// own connection past the initial lookup.
async fn race_toggles(database_url: &str, target: LikeTarget, ip: &str) -> Vec<bool> {
    // Every party keeps a connection while parked at the barrier.
    let pool = create_pool(database_url, RACE_PARTIES as u32 + 2)
        .await
        .expect("race pool");
    let store = GatedStore {
        inner: SqlxLikeRepository::new(pool),
        barrier: Arc::new(Barrier::new(RACE_PARTIES)),
    };
    let service = Arc::new(LikeToggleService::new(Arc::new(store)));

    let handles: Vec<_> = (0..RACE_PARTIES)
        .map(|_| {
            let service = service.clone();
            let ip = ip.to_string();
            tokio::spawn(async move { service.toggle(target, &ip).await })
        })
        .collect();

    let mut liked = Vec::with_capacity(RACE_PARTIES);
    for handle in join_all(handles).await {
        liked.push(handle.expect("toggle task panicked").expect("toggle failed").liked);
    }
    liked
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_likes_insert_one_mark_and_count_once() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-gated-like"), &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let target = LikeTarget::new(TargetKind::Post, post_id as i32);

    let results = race_toggles(&app.database_url, target, &unique_ip()).await;

    assert_eq!(results, vec![true; RACE_PARTIES]);
    assert_eq!(post_like_state(&app.db, post_id).await, (1, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_unlikes_remove_one_mark_and_decrement_once() {
    let Some(app) = spawn_app().await else { return };
    let post = create_post(&app.app, &unique_slug("likes-gated-unlike"), &[]).await;
    let post_id = post["id"].as_i64().unwrap();
    let target = LikeTarget::new(TargetKind::Post, post_id as i32);
    let (racer, bystander) = (unique_ip(), unique_ip());
    toggle(&app.app, "post", post_id, &racer).await;
    toggle(&app.app, "post", post_id, &bystander).await;
    assert_eq!(post_like_state(&app.db, post_id).await, (2, 2));

    let results = race_toggles(&app.database_url, target, &racer).await;

    assert_eq!(results, vec![false; RACE_PARTIES]);
    assert_eq!(post_like_state(&app.db, post_id).await, (1, 1));
}
