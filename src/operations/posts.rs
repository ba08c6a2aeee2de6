use crate::client::RequestExecutor;
use crate::error::Result;
use crate::models::{ApiCall, Host};
use crate::operations::listing::{paginate, ListingOptions, ListingShape};
use crate::operations::{check_json_errors, pluck, subreddit_name};
use crate::params::ItemParameters;
use log::info;
use serde_json::{json, Value};

const HOST: Host = Host::Authenticated;

/// Fullname prefix of links (posts).
pub const POST_PREFIX: &str = "t3_";

/// Kind of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    /// Text post
    SelfPost,
    Link,
    Image,
}

impl PostKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "self" => Some(PostKind::SelfPost),
            "link" => Some(PostKind::Link),
            "image" => Some(PostKind::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::SelfPost => "self",
            PostKind::Link => "link",
            PostKind::Image => "image",
        }
    }
}

/// Body of a new submission: text for self posts, a URL otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum PostContent {
    Text(String),
    Url { url: String, resubmit: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub subreddit: String,
    pub title: String,
    pub kind: PostKind,
    pub content: PostContent,
}

/// Sort order of a subreddit listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Top,
    Hot,
    New,
    Rising,
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Category::Top),
            "hot" => Some(Category::Hot),
            "new" => Some(Category::New),
            "rising" => Some(Category::Rising),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Hot => "hot",
            Category::New => "new",
            Category::Rising => "rising",
        }
    }
}

/// Where a search looks for posts.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchLocation {
    AllReddit,
    Subreddit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    Comments,
    Hot,
    New,
    Relevance,
    Top,
}

impl SearchSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "comments" => Some(SearchSort::Comments),
            "hot" => Some(SearchSort::Hot),
            "new" => Some(SearchSort::New),
            "relevance" => Some(SearchSort::Relevance),
            "top" => Some(SearchSort::Top),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Comments => "comments",
            SearchSort::Hot => "hot",
            SearchSort::New => "new",
            SearchSort::Relevance => "relevance",
            SearchSort::Top => "top",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostSearch {
    pub location: SearchLocation,
    pub keyword: String,
    pub sort: Option<SearchSort>,
    pub listing: ListingOptions,
}

/// Operations on the `post` resource.
#[derive(Debug, Clone, PartialEq)]
pub enum PostOperation {
    Create(NewPost),
    Delete {
        post_id: String,
    },
    Get {
        subreddit: String,
        post_id: String,
    },
    GetAll {
        subreddit: String,
        category: Option<Category>,
        listing: ListingOptions,
    },
    Search(PostSearch),
}

impl PostOperation {
    pub fn resolve(operation: &str, params: &ItemParameters) -> Result<Option<Self>> {
        let op = match operation {
            "create" => {
                let kind = params.choice("kind", PostKind::SelfPost, PostKind::parse)?;
                let content = match kind {
                    PostKind::SelfPost => PostContent::Text(params.string("text")?),
                    PostKind::Link | PostKind::Image => PostContent::Url {
                        url: params.string("url")?,
                        resubmit: params.bool_or("resubmit", false)?,
                    },
                };
                PostOperation::Create(NewPost {
                    subreddit: params.string("subreddit")?,
                    title: params.string("title")?,
                    kind,
                    content,
                })
            }
            "delete" => PostOperation::Delete {
                post_id: params.string("postId")?,
            },
            "get" => PostOperation::Get {
                subreddit: params.string("subreddit")?,
                post_id: params.string("postId")?,
            },
            "getAll" => PostOperation::GetAll {
                subreddit: params.string("subreddit")?,
                category: params.collection("filters")?.choice("category", Category::parse)?,
                listing: ListingOptions::from_params(params)?,
            },
            "search" => {
                let location = match params.optional_string("location")?.as_deref() {
                    None | Some("subreddit") => {
                        SearchLocation::Subreddit(params.string("subreddit")?)
                    }
                    Some("allReddit") => SearchLocation::AllReddit,
                    Some(other) => {
                        return Err(crate::error::Error::invalid(
                            "location",
                            format!("unsupported value \"{other}\""),
                        ))
                    }
                };
                PostOperation::Search(PostSearch {
                    location,
                    keyword: params.string("keyword")?,
                    sort: params
                        .collection("additionalFields")?
                        .choice("sort", SearchSort::parse)?,
                    listing: ListingOptions::from_params(params)?,
                })
            }
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    pub async fn execute(&self, executor: &dyn RequestExecutor) -> Result<Value> {
        match self {
            PostOperation::Create(post) => create(executor, post).await,
            PostOperation::Delete { post_id } => {
                // https://www.reddit.com/dev/api/#POST_api_del
                let call = ApiCall::post(HOST, "api/del").param("id", format!("{POST_PREFIX}{post_id}"));
                executor.execute(&call).await?;
                info!("Deleted post {post_id}");
                Ok(json!({ "success": true }))
            }
            PostOperation::Get { subreddit, post_id } => {
                let path = format!("r/{}/comments/{post_id}.json", subreddit_name(subreddit));
                let response = executor.execute(&ApiCall::get(HOST, &path)).await?;
                pluck(response, "/0/data/children/0/data", &path)
            }
            PostOperation::GetAll {
                subreddit,
                category,
                listing,
            } => {
                // https://www.reddit.com/dev/api/#GET_{sort}
                let path = match category {
                    Some(category) => format!("r/{}/{}.json", subreddit_name(subreddit), category.as_str()),
                    None => format!("r/{}.json", subreddit_name(subreddit)),
                };
                let records = paginate(executor, ApiCall::get(HOST, path), ListingShape::Children, *listing).await?;
                Ok(Value::Array(records))
            }
            PostOperation::Search(search) => self::search(executor, search).await,
        }
    }
}

/// https://www.reddit.com/dev/api/#POST_api_submit
async fn create(executor: &dyn RequestExecutor, post: &NewPost) -> Result<Value> {
    let mut call = ApiCall::post(HOST, "api/submit")
        .param("title", post.title.as_str())
        .param("sr", subreddit_name(&post.subreddit))
        .param("kind", post.kind.as_str());
    call = match &post.content {
        PostContent::Text(text) => call.param("text", text.as_str()),
        PostContent::Url { url, resubmit } => call.param("url", url.as_str()).param("resubmit", *resubmit),
    };

    info!("Creating a new post in r/{}: '{}'", subreddit_name(&post.subreddit), post.title);
    let response = executor.execute(&call).await?;
    check_json_errors(&response)?;
    pluck(response, "/json/data", "api/submit")
}

/// https://www.reddit.com/dev/api/#GET_search
async fn search(executor: &dyn RequestExecutor, search: &PostSearch) -> Result<Value> {
    let (path, restrict_sr) = match &search.location {
        SearchLocation::AllReddit => ("search.json".to_string(), false),
        SearchLocation::Subreddit(subreddit) => {
            (format!("r/{}/search.json", subreddit_name(subreddit)), true)
        }
    };

    let mut call = ApiCall::get(HOST, path)
        .param("q", search.keyword.as_str())
        .param("restrict_sr", restrict_sr);
    if let Some(sort) = search.sort {
        call = call.param("sort", sort.as_str());
    }

    let mut records = paginate(executor, call, ListingShape::Children, search.listing).await?;
    search.listing.truncate(&mut records);
    Ok(Value::Array(records))
}
