use crate::domain::{
    post::entity::{NewPost, Post, PostChanges, PostFilter, PostSort},
    shared::pagination::PaginationRequest,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

lazy_static! {
    static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

const DEFAULT_READ_TIME: i32 = 5;

fn default_read_time() -> i32 {
    DEFAULT_READ_TIME
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255), regex(path = *SLUG_REGEX))]
    pub slug: String,
    #[validate(length(min = 1))]
    pub excerpt: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(max = 500))]
    pub cover_image: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tags: Vec<String>,
    /// Minutes
    #[serde(default = "default_read_time")]
    #[validate(range(min = 1, max = 600))]
    pub read_time: i32,
}

impl From<CreatePostRequest> for NewPost {
    fn from(r: CreatePostRequest) -> Self {
        NewPost {
            title: r.title,
            slug: r.slug,
            excerpt: r.excerpt,
            content: r.content,
            cover_image: r.cover_image,
            tags: r.tags,
            read_time: r.read_time,
        }
    }
}

/// Body of PUT/PATCH; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub cover_image: Option<String>,
    #[validate(length(max = 20))]
    pub tags: Option<Vec<String>>,
    #[validate(range(min = 1, max = 600))]
    pub read_time: Option<i32>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(r: UpdatePostRequest) -> Self {
        PostChanges {
            title: r.title,
            excerpt: r.excerpt,
            content: r.content,
            cover_image: r.cover_image,
            tags: r.tags,
            read_time: r.read_time,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListPostsQuery {
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListPostsQuery {
    /// Unknown sort keys fall back to newest first.
    pub fn into_filter(self) -> PostFilter {
        let sort = match self.sort.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("popular") => PostSort::Popular,
            _ => PostSort::Newest,
        };
        PostFilter {
            tag: self.tag,
            sort,
            page: PaginationRequest::new(self.limit, self.offset),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostResponse {
    pub post: Post,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
}
