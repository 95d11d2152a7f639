use super::Forum;
use super::Post;
use super::Thread;
use serde::Deserialize;
use serde::Serialize;

/// Body of POST /api/forum.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateForumRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub readable_role_ids: Option<Vec<i32>>,
    pub writable_role_ids: Option<Vec<i32>>,
}

/// Body of PATCH /api/forum/{slug}. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateForumRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub readable_role_ids: Option<Vec<i32>>,
    pub writable_role_ids: Option<Vec<i32>>,
}

impl UpdateForumRequest {
    /// Folds the patch into an existing record. Role sets can be granted
    /// but not revoked through the patch shape; that mirrors the stored
    /// shape where `None` means "no gating declared".
    pub fn apply(self, forum: Forum) -> Forum {
        Forum {
            slug: self.slug.unwrap_or(forum.slug),
            name: self.name.unwrap_or(forum.name),
            description: self.description.unwrap_or(forum.description),
            icon: self.icon.unwrap_or(forum.icon),
            readable_role_ids: self.readable_role_ids.or(forum.readable_role_ids),
            writable_role_ids: self.writable_role_ids.or(forum.writable_role_ids),
        }
    }
}

/// Body of POST /api/thread.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub title: String,
    pub content: String,
    pub parent_forum_id: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub hidden: bool,
}

/// Body of POST /api/post/{threadId}.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

/// GET /api/forum/{slug}/threads response.
#[derive(Debug, Serialize)]
pub struct ForumThreads {
    pub forum: Forum,
    pub threads: Vec<Thread>,
}

/// GET /api/thread/{id} response.
#[derive(Debug, Serialize)]
pub struct ThreadPosts {
    pub thread: Thread,
    pub posts: Vec<Post>,
}

/// POST /api/thread response: the thread's own fields merged with the
/// seed post's content at the top level.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadWithContent {
    #[serde(flatten)]
    pub thread: Thread,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_body_defaults_its_flags() {
        let body: CreateThreadRequest = serde_json::from_str(
            r#"{"title": "t", "content": "c", "parentForumId": "general"}"#,
        )
        .unwrap();
        assert!(!body.closed && !body.pinned && !body.hidden);
    }

    #[test]
    fn forum_patch_keeps_unnamed_fields() {
        let existing = Forum {
            slug: "general".into(),
            name: "General".into(),
            description: "talk".into(),
            icon: String::new(),
            readable_role_ids: Some(vec![1]),
            writable_role_ids: None,
        };
        let patch: UpdateForumRequest =
            serde_json::from_str(r#"{"name": "Lounge"}"#).unwrap();
        let patched = patch.apply(existing);
        assert_eq!(patched.name, "Lounge");
        assert_eq!(patched.slug, "general");
        assert_eq!(patched.description, "talk");
        assert_eq!(patched.readable_role_ids, Some(vec![1]));
    }

    #[test]
    fn created_thread_merges_content_at_the_top_level() {
        let merged = ThreadWithContent {
            thread: Thread {
                id: agora_core::ID::from(String::from("abcdefghijkl")),
                title: "t".into(),
                parent_forum_id: "general".into(),
                author_id: "kelechi".into(),
                created_on: chrono::Utc::now(),
                closed: false,
                pinned: false,
                hidden: false,
            },
            content: "first".into(),
        };
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["id"], "abcdefghijkl");
        assert_eq!(json["content"], "first");
        assert!(json.get("thread").is_none());
    }
}
