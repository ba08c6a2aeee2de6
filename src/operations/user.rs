use crate::client::RequestExecutor;
use crate::error::Result;
use crate::models::{ApiCall, Host};
use crate::operations::listing::{paginate, ListingOptions, ListingShape};
use crate::operations::pluck;
use crate::params::ItemParameters;
use serde_json::Value;

/// Public view of another account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDetail {
    About,
    Comments,
    Gilded,
    Overview,
    Submitted,
}

impl UserDetail {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "about" => Some(UserDetail::About),
            "comments" => Some(UserDetail::Comments),
            "gilded" => Some(UserDetail::Gilded),
            "overview" => Some(UserDetail::Overview),
            "submitted" => Some(UserDetail::Submitted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserDetail::About => "about",
            UserDetail::Comments => "comments",
            UserDetail::Gilded => "gilded",
            UserDetail::Overview => "overview",
            UserDetail::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserOperation {
    Get {
        username: String,
        detail: UserDetail,
        listing: ListingOptions,
    },
}

impl UserOperation {
    pub fn resolve(operation: &str, params: &ItemParameters) -> Result<Option<Self>> {
        match operation {
            "get" => Ok(Some(UserOperation::Get {
                username: params.string("username")?,
                detail: params.choice("details", UserDetail::About, UserDetail::parse)?,
                listing: ListingOptions::from_params(params)?,
            })),
            _ => Ok(None),
        }
    }

    /// https://www.reddit.com/dev/api/#GET_user_{username}_{where}
    pub async fn execute(&self, executor: &dyn RequestExecutor) -> Result<Value> {
        let UserOperation::Get {
            username,
            detail,
            listing,
        } = self;
        let username = username.trim_start_matches("u/");
        let call = ApiCall::get(Host::Public, format!("user/{username}/{}.json", detail.as_str()));

        if *detail == UserDetail::About {
            let response = executor.execute(&call).await?;
            return pluck(response, "/data", &call.path);
        }
        let records = paginate(executor, call, ListingShape::Children, *listing).await?;
        Ok(Value::Array(records))
    }
}
