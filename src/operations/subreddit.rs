use crate::client::RequestExecutor;
use crate::error::{Error, Result};
use crate::models::{ApiCall, Host};
use crate::operations::listing::{paginate, ListingOptions, ListingShape};
use crate::operations::{pluck, subreddit_name};
use crate::params::ItemParameters;
use serde_json::{json, Value};

const HOST: Host = Host::Public;

/// Part of a subreddit to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubredditContent {
    About,
    Rules,
}

impl SubredditContent {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "about" => Some(SubredditContent::About),
            "rules" => Some(SubredditContent::Rules),
            _ => None,
        }
    }
}

/// Which subreddits to list. Trending wins over a keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum SubredditFilter {
    Trending,
    Keyword(String),
    All,
}

/// Operations on the `subreddit` resource.
#[derive(Debug, Clone, PartialEq)]
pub enum SubredditOperation {
    Get {
        subreddit: String,
        content: SubredditContent,
    },
    GetAll {
        filter: SubredditFilter,
        listing: ListingOptions,
    },
}

impl SubredditOperation {
    pub fn resolve(operation: &str, params: &ItemParameters) -> Result<Option<Self>> {
        let op = match operation {
            "get" => SubredditOperation::Get {
                subreddit: params.string("subreddit")?,
                content: params.choice("content", SubredditContent::About, SubredditContent::parse)?,
            },
            "getAll" => {
                let filters = params.collection("filters")?;
                let filter = if filters.bool_or("trending", false)? {
                    SubredditFilter::Trending
                } else if let Some(keyword) = filters.optional_string("keyword")? {
                    SubredditFilter::Keyword(keyword)
                } else {
                    SubredditFilter::All
                };
                SubredditOperation::GetAll {
                    filter,
                    listing: ListingOptions::from_params(params)?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    pub async fn execute(&self, executor: &dyn RequestExecutor) -> Result<Value> {
        match self {
            SubredditOperation::Get { subreddit, content } => {
                // https://www.reddit.com/dev/api/#GET_r_{subreddit}_about
                let (suffix, pointer) = match content {
                    SubredditContent::About => ("about", "/data"),
                    SubredditContent::Rules => ("rules", "/rules"),
                };
                let path = format!("r/{}/about/{suffix}.json", subreddit_name(subreddit));
                let response = executor.execute(&ApiCall::get(HOST, &path)).await?;
                pluck(response, pointer, &path)
            }
            SubredditOperation::GetAll { filter, listing } => {
                let records = match filter {
                    SubredditFilter::Trending => trending(executor, *listing).await?,
                    SubredditFilter::Keyword(keyword) => {
                        let call = ApiCall::post(HOST, "api/search_subreddits.json").param("query", keyword.as_str());
                        paginate(executor, call, ListingShape::SearchSubreddits, *listing).await?
                    }
                    SubredditFilter::All => {
                        let call = ApiCall::get(HOST, "r/subreddits.json");
                        paginate(executor, call, ListingShape::Children, *listing).await?
                    }
                };
                Ok(Value::Array(records))
            }
        }
    }
}

/// https://www.reddit.com/dev/api/#GET_api_trending_subreddits
async fn trending(executor: &dyn RequestExecutor, listing: ListingOptions) -> Result<Vec<Value>> {
    const PATH: &str = "api/trending_subreddits.json";
    let response = executor.execute(&ApiCall::get(HOST, PATH)).await?;
    let names = response
        .get("subreddit_names")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::shape(PATH, "a subreddit_names array"))?;

    let mut records: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
    listing.truncate(&mut records);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Method;
    use crate::test_utils::{listing_page, single_item, MockExecutor};
    use pretty_assertions::assert_eq;

    fn resolve(operation: &str, item: Value) -> SubredditOperation {
        let params = single_item(item);
        SubredditOperation::resolve(operation, &ItemParameters::new(&params, 0))
            .unwrap()
            .unwrap()
    }

    mod get {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_returns_about_data() {
            let op = resolve("get", json!({"subreddit": "rust", "content": "about"}));
            let executor = MockExecutor::new(vec![json!({"kind": "t5", "data": {"display_name": "rust"}})]);

            let result = op.execute(&executor).await.unwrap();

            let call = executor.single_call();
            assert_eq!(call.host, Host::Public);
            assert_eq!(call.path, "r/rust/about/about.json");
            assert_eq!(result, json!({"display_name": "rust"}));
        }

        #[tokio::test]
        async fn it_returns_rules() {
            let op = resolve("get", json!({"subreddit": "r/rust", "content": "rules"}));
            let executor = MockExecutor::new(vec![json!({
                "rules": [{"short_name": "Be civil"}],
                "site_rules": ["Spam"]
            })]);

            let result = op.execute(&executor).await.unwrap();

            assert_eq!(executor.single_call().path, "r/rust/about/rules.json");
            assert_eq!(result, json!([{"short_name": "Be civil"}]));
        }
    }

    mod get_all {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_prefers_trending_over_keyword() {
            let op = resolve(
                "getAll",
                json!({"filters": {"trending": true, "keyword": "rust"}, "limit": 2}),
            );
            let executor = MockExecutor::new(vec![json!({
                "subreddit_names": ["a", "b", "c"],
                "comment_count": 12
            })]);

            let result = op.execute(&executor).await.unwrap();

            let call = executor.single_call();
            assert_eq!(call.method, Method::Get);
            assert_eq!(call.path, "api/trending_subreddits.json");
            assert_eq!(result, json!([{"name": "a"}, {"name": "b"}]));
        }

        #[tokio::test]
        async fn it_returns_every_trending_name_with_return_all() {
            let op = resolve("getAll", json!({"filters": {"trending": true}, "returnAll": true, "limit": 1}));
            let executor = MockExecutor::new(vec![json!({"subreddit_names": ["a", "b", "c"]})]);

            let result = op.execute(&executor).await.unwrap();
            assert_eq!(result.as_array().unwrap().len(), 3);
        }

        #[tokio::test]
        async fn it_searches_by_keyword() {
            let op = resolve("getAll", json!({"filters": {"keyword": "rust"}, "limit": 1}));
            let executor = MockExecutor::new(vec![json!({
                "subreddits": [{"name": "rust", "subscriber_count": 300000}, {"name": "learnrust"}]
            })]);

            let result = op.execute(&executor).await.unwrap();

            let call = executor.single_call();
            assert_eq!(call.method, Method::Post);
            assert_eq!(call.path, "api/search_subreddits.json");
            assert_eq!(call.query.get("query"), Some(&json!("rust")));
            assert_eq!(result, json!([{"name": "rust", "subscriber_count": 300000}]));
        }

        #[tokio::test]
        async fn it_lists_the_default_directory() {
            let op = resolve("getAll", json!({"limit": 10}));
            let executor = MockExecutor::new(vec![
                listing_page(0, 100, Some("t5_99")),
                listing_page(100, 100, None),
            ]);

            let result = op.execute(&executor).await.unwrap();

            let call = executor.single_call();
            assert_eq!(call.path, "r/subreddits.json");
            assert_eq!(call.query.get("limit"), Some(&json!(100)));
            assert_eq!(result.as_array().unwrap().len(), 10);
        }

        #[test]
        fn it_ignores_an_empty_keyword() {
            let op = resolve("getAll", json!({"filters": {"keyword": ""}}));
            assert!(matches!(op, SubredditOperation::GetAll { filter: SubredditFilter::All, .. }));
        }
    }
}
