//! Operations module maps (resource, operation) pairs onto Reddit API calls.
//!
//! Every supported pair resolves to one typed variant of [`Operation`];
//! executing it issues the request(s) and reshapes the response into records.

pub mod comment;
pub mod dispatcher;
pub mod listing;
pub mod posts;
pub mod profile;
pub mod subreddit;
pub mod user;

use crate::client::RequestExecutor;
use crate::error::{Error, Result};
use crate::models::Host;
use crate::params::{ItemParameters, DEFAULT_LIMIT};
use serde_json::Value;

pub use comment::CommentOperation;
pub use dispatcher::Dispatcher;
pub use listing::{paginate, ListingOptions, ListingShape};
pub use posts::PostOperation;
pub use profile::ProfileOperation;
pub use subreddit::SubredditOperation;
pub use user::UserOperation;

/// Reddit resource an operation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    PostComment,
    Profile,
    Subreddit,
    User,
}

impl Resource {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "post" => Some(Resource::Post),
            "postComment" => Some(Resource::PostComment),
            "profile" => Some(Resource::Profile),
            "subreddit" => Some(Resource::Subreddit),
            "user" => Some(Resource::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Post => "post",
            Resource::PostComment => "postComment",
            Resource::Profile => "profile",
            Resource::Subreddit => "subreddit",
            Resource::User => "user",
        }
    }

    /// Host serving this resource: account-bound resources need OAuth.
    pub fn host(&self) -> Host {
        match self {
            Resource::Post | Resource::PostComment | Resource::Profile => Host::Authenticated,
            Resource::Subreddit | Resource::User => Host::Public,
        }
    }
}

/// Every supported (resource, operation) pair.
pub const SUPPORTED_OPERATIONS: [(Resource, &str); 13] = [
    (Resource::Post, "create"),
    (Resource::Post, "delete"),
    (Resource::Post, "get"),
    (Resource::Post, "getAll"),
    (Resource::Post, "search"),
    (Resource::PostComment, "create"),
    (Resource::PostComment, "delete"),
    (Resource::PostComment, "getAll"),
    (Resource::PostComment, "reply"),
    (Resource::Profile, "get"),
    (Resource::Subreddit, "get"),
    (Resource::Subreddit, "getAll"),
    (Resource::User, "get"),
];

/// A fully resolved operation with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Post(PostOperation),
    PostComment(CommentOperation),
    Profile(ProfileOperation),
    Subreddit(SubredditOperation),
    User(UserOperation),
}

impl Operation {
    /// Resolves a (resource, operation) pair and reads its parameters.
    pub fn resolve(resource: &str, operation: &str, params: &ItemParameters) -> Result<Self> {
        let unknown = || Error::UnknownOperation {
            resource: resource.to_string(),
            operation: operation.to_string(),
        };

        let resolved = match Resource::parse(resource).ok_or_else(unknown)? {
            Resource::Post => PostOperation::resolve(operation, params)?.map(Operation::Post),
            Resource::PostComment => {
                CommentOperation::resolve(operation, params)?.map(Operation::PostComment)
            }
            Resource::Profile => ProfileOperation::resolve(operation, params)?.map(Operation::Profile),
            Resource::Subreddit => {
                SubredditOperation::resolve(operation, params)?.map(Operation::Subreddit)
            }
            Resource::User => UserOperation::resolve(operation, params)?.map(Operation::User),
        };
        resolved.ok_or_else(unknown)
    }

    pub fn resource(&self) -> Resource {
        match self {
            Operation::Post(_) => Resource::Post,
            Operation::PostComment(_) => Resource::PostComment,
            Operation::Profile(_) => Resource::Profile,
            Operation::Subreddit(_) => Resource::Subreddit,
            Operation::User(_) => Resource::User,
        }
    }

    /// Issues the request(s) and returns the reshaped result.
    pub async fn execute(&self, executor: &dyn RequestExecutor) -> Result<Value> {
        match self {
            Operation::Post(op) => op.execute(executor).await,
            Operation::PostComment(op) => op.execute(executor).await,
            Operation::Profile(op) => op.execute(executor).await,
            Operation::Subreddit(op) => op.execute(executor).await,
            Operation::User(op) => op.execute(executor).await,
        }
    }
}

impl ListingOptions {
    /// Reads `returnAll` and `limit` for an item.
    pub fn from_params(params: &ItemParameters) -> Result<Self> {
        Ok(Self {
            return_all: params.bool_or("returnAll", false)?,
            limit: params.count_or("limit", DEFAULT_LIMIT)?,
        })
    }
}

/// Strips a leading `r/` or `/r/` from a subreddit name.
pub(crate) fn subreddit_name(name: &str) -> &str {
    let trimmed = name.trim_start_matches('/');
    trimmed.strip_prefix("r/").unwrap_or(trimmed)
}

/// Takes the value at a JSON pointer out of a response.
pub(crate) fn pluck(mut response: Value, pointer: &str, path: &str) -> Result<Value> {
    response
        .pointer_mut(pointer)
        .map(Value::take)
        .ok_or_else(|| Error::shape(path, format!("a value at {pointer}")))
}

/// Fails when a `api_type=json` response reports errors in `json.errors`.
pub(crate) fn check_json_errors(response: &Value) -> Result<()> {
    match response.pointer("/json/errors").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => Err(Error::ApiRequestFailed {
            status: Some(200),
            body: Value::Array(errors.clone()).to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::JsonItems;
    use serde_json::json;

    fn resolve(resource: &str, operation: &str, item: Value) -> Result<Operation> {
        let params = JsonItems::from_value(json!([item])).unwrap();
        Operation::resolve(resource, operation, &ItemParameters::new(&params, 0))
    }

    #[test]
    fn it_resolves_every_supported_pair() {
        let item = json!({
            "subreddit": "test",
            "postId": "abc123",
            "commentId": "def456",
            "title": "Hello",
            "text": "World",
            "commentText": "Nice",
            "replyText": "Thanks",
            "keyword": "rust",
            "username": "spez",
        });
        for (resource, operation) in SUPPORTED_OPERATIONS {
            let resolved = resolve(resource.as_str(), operation, item.clone())
                .unwrap_or_else(|e| panic!("{}.{operation} failed: {e}", resource.as_str()));
            assert_eq!(resolved.resource(), resource);
        }
    }

    #[test]
    fn it_rejects_unknown_operations() {
        let err = resolve("post", "upvote", json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownOperation { .. }));
    }

    #[test]
    fn it_rejects_operations_of_another_resource() {
        let err = resolve("user", "search", json!({"keyword": "rust"})).unwrap_err();
        assert!(matches!(err, Error::UnknownOperation { .. }));
    }

    #[test]
    fn it_rejects_unknown_resources() {
        let err = resolve("moderator", "get", json!({})).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownOperation { ref resource, .. } if resource == "moderator"
        ));
    }

    #[test]
    fn it_routes_account_resources_through_oauth() {
        assert_eq!(Resource::Post.host(), Host::Authenticated);
        assert_eq!(Resource::PostComment.host(), Host::Authenticated);
        assert_eq!(Resource::Profile.host(), Host::Authenticated);
        assert_eq!(Resource::Subreddit.host(), Host::Public);
        assert_eq!(Resource::User.host(), Host::Public);
    }

    #[test]
    fn it_strips_subreddit_prefixes() {
        assert_eq!(subreddit_name("rust"), "rust");
        assert_eq!(subreddit_name("r/rust"), "rust");
        assert_eq!(subreddit_name("/r/rust"), "rust");
    }

    #[test]
    fn it_reports_json_errors() {
        let response = json!({"json": {"errors": [["SUBREDDIT_NOEXIST", "that subreddit doesn't exist", "sr"]]}});
        assert!(check_json_errors(&response).is_err());
        assert!(check_json_errors(&json!({"json": {"errors": [], "data": {}}})).is_ok());
    }
}
