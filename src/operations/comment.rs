use crate::client::RequestExecutor;
use crate::error::Result;
use crate::models::{ApiCall, Host};
use crate::operations::listing::{paginate, ListingOptions, ListingShape};
use crate::operations::posts::POST_PREFIX;
use crate::operations::{check_json_errors, pluck, subreddit_name};
use crate::params::ItemParameters;
use log::info;
use serde_json::{json, Value};

const HOST: Host = Host::Authenticated;

/// Fullname prefix of comments.
pub const COMMENT_PREFIX: &str = "t1_";

/// Operations on the `postComment` resource.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentOperation {
    Create {
        post_id: String,
        text: String,
    },
    Delete {
        comment_id: String,
    },
    GetAll {
        subreddit: String,
        post_id: String,
        listing: ListingOptions,
    },
    Reply {
        comment_id: String,
        text: String,
    },
}

impl CommentOperation {
    pub fn resolve(operation: &str, params: &ItemParameters) -> Result<Option<Self>> {
        let op = match operation {
            "create" => CommentOperation::Create {
                post_id: params.string("postId")?,
                text: params.string("commentText")?,
            },
            "delete" => CommentOperation::Delete {
                comment_id: params.string("commentId")?,
            },
            "getAll" => CommentOperation::GetAll {
                subreddit: params.string("subreddit")?,
                post_id: params.string("postId")?,
                listing: ListingOptions::from_params(params)?,
            },
            "reply" => CommentOperation::Reply {
                comment_id: params.string("commentId")?,
                text: params.string("replyText")?,
            },
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    pub async fn execute(&self, executor: &dyn RequestExecutor) -> Result<Value> {
        match self {
            CommentOperation::Create { post_id, text } => {
                info!("Commenting on post {post_id}");
                submit_comment(executor, format!("{POST_PREFIX}{post_id}"), text).await
            }
            CommentOperation::Reply { comment_id, text } => {
                info!("Replying to comment {comment_id}");
                submit_comment(executor, format!("{COMMENT_PREFIX}{comment_id}"), text).await
            }
            CommentOperation::Delete { comment_id } => {
                let call = ApiCall::post(HOST, "api/del").param("id", format!("{COMMENT_PREFIX}{comment_id}"));
                executor.execute(&call).await?;
                info!("Deleted comment {comment_id}");
                Ok(json!({ "success": true }))
            }
            CommentOperation::GetAll {
                subreddit,
                post_id,
                listing,
            } => {
                let path = format!("r/{}/comments/{post_id}.json", subreddit_name(subreddit));
                let records = paginate(executor, ApiCall::get(HOST, path), ListingShape::CommentThread, *listing).await?;
                Ok(Value::Array(records))
            }
        }
    }
}

/// https://www.reddit.com/dev/api/#POST_api_comment
async fn submit_comment(executor: &dyn RequestExecutor, thing_id: String, text: &str) -> Result<Value> {
    let call = ApiCall::post(HOST, "api/comment")
        .param("text", text)
        .param("thing_id", thing_id);
    let response = executor.execute(&call).await?;
    check_json_errors(&response)?;
    pluck(response, "/json/data/things/0/data", "api/comment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Method;
    use crate::test_utils::{single_item, MockExecutor};
    use pretty_assertions::assert_eq;

    fn resolve(operation: &str, item: Value) -> CommentOperation {
        let params = single_item(item);
        CommentOperation::resolve(operation, &ItemParameters::new(&params, 0))
            .unwrap()
            .unwrap()
    }

    fn comment_response(id: &str) -> Value {
        json!({
            "json": {"errors": [], "data": {"things": [{"kind": "t1", "data": {"id": id, "body": "Nice"}}]}}
        })
    }

    #[tokio::test]
    async fn it_comments_on_a_post() {
        let op = resolve("create", json!({"postId": "abc123", "commentText": "Nice"}));
        let executor = MockExecutor::new(vec![comment_response("c1")]);

        let result = op.execute(&executor).await.unwrap();

        let call = executor.single_call();
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.host, Host::Authenticated);
        assert_eq!(call.path, "api/comment");
        assert_eq!(Value::Object(call.query), json!({"text": "Nice", "thing_id": "t3_abc123"}));
        assert_eq!(result, json!({"id": "c1", "body": "Nice"}));
    }

    #[tokio::test]
    async fn it_replies_to_a_comment() {
        let op = resolve("reply", json!({"commentId": "def456", "replyText": "Thanks"}));
        let executor = MockExecutor::new(vec![comment_response("c2")]);

        op.execute(&executor).await.unwrap();

        assert_eq!(
            Value::Object(executor.single_call().query),
            json!({"text": "Thanks", "thing_id": "t1_def456"})
        );
    }

    #[test]
    fn it_reads_the_reply_text_not_the_comment_text() {
        let params = single_item(json!({"commentId": "def456", "commentText": "Wrong field"}));
        let err = CommentOperation::resolve("reply", &ItemParameters::new(&params, 0)).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref name, .. } if name == "replyText"));
    }

    #[tokio::test]
    async fn it_fails_when_the_comment_is_rejected() {
        let op = resolve("create", json!({"postId": "locked", "commentText": "Nice"}));
        let executor = MockExecutor::new(vec![json!({
            "json": {"errors": [["THREAD_LOCKED", "that thread is locked", "parent"]]}
        })]);

        let err = op.execute(&executor).await.unwrap_err();
        assert!(matches!(err, Error::ApiRequestFailed { .. }));
    }

    #[tokio::test]
    async fn it_deletes_a_comment() {
        let op = resolve("delete", json!({"commentId": "def456"}));
        let executor = MockExecutor::new(vec![json!({})]);

        let result = op.execute(&executor).await.unwrap();

        let call = executor.single_call();
        assert_eq!(call.path, "api/del");
        assert_eq!(Value::Object(call.query), json!({"id": "t1_def456"}));
        assert_eq!(result, json!({"success": true}));
    }

    #[tokio::test]
    async fn it_lists_the_comments_of_a_post() {
        let op = resolve("getAll", json!({"subreddit": "test", "postId": "abc123", "limit": 1}));
        let executor = MockExecutor::new(vec![json!([
            {"data": {"children": [{"kind": "t3", "data": {"id": "abc123"}}]}},
            {"data": {"after": null, "children": [
                {"kind": "t1", "data": {"id": "c1"}},
                {"kind": "t1", "data": {"id": "c2"}}
            ]}}
        ])]);

        let result = op.execute(&executor).await.unwrap();

        let call = executor.single_call();
        assert_eq!(call.method, Method::Get);
        assert_eq!(call.path, "r/test/comments/abc123.json");
        assert_eq!(result, json!([{"id": "c1"}]));
    }
}
