use crate::client::RequestExecutor;
use crate::error::{Error, Result};
use crate::models::{ApiCall, Host};
use crate::operations::listing::{paginate, ListingOptions, ListingShape};
use crate::operations::pluck;
use crate::params::ItemParameters;
use log::debug;
use serde_json::Value;

const HOST: Host = Host::Authenticated;

/// What to read about the authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileDetail {
    BlockedUsers,
    Friends,
    Identity,
    Karma,
    Prefs,
    Saved,
    Trophies,
}

impl ProfileDetail {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "blockedUsers" => Some(ProfileDetail::BlockedUsers),
            "friends" => Some(ProfileDetail::Friends),
            "identity" => Some(ProfileDetail::Identity),
            "karma" => Some(ProfileDetail::Karma),
            "prefs" => Some(ProfileDetail::Prefs),
            "saved" => Some(ProfileDetail::Saved),
            "trophies" => Some(ProfileDetail::Trophies),
            _ => None,
        }
    }

    /// `api/v1/...` endpoint of the detail. Saved items live under the user listing instead.
    fn endpoint(&self) -> &'static str {
        match self {
            ProfileDetail::Identity | ProfileDetail::Saved => "api/v1/me",
            ProfileDetail::BlockedUsers => "api/v1/me/blocked",
            ProfileDetail::Friends => "api/v1/me/friends",
            ProfileDetail::Karma => "api/v1/me/karma",
            ProfileDetail::Prefs => "api/v1/me/prefs",
            ProfileDetail::Trophies => "api/v1/me/trophies",
        }
    }
}

/// Operations on the `profile` resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOperation {
    Get {
        detail: ProfileDetail,
        listing: ListingOptions,
    },
}

impl ProfileOperation {
    pub fn resolve(operation: &str, params: &ItemParameters) -> Result<Option<Self>> {
        match operation {
            "get" => Ok(Some(ProfileOperation::Get {
                detail: params.choice("details", ProfileDetail::Identity, ProfileDetail::parse)?,
                listing: ListingOptions::from_params(params)?,
            })),
            _ => Ok(None),
        }
    }

    pub async fn execute(&self, executor: &dyn RequestExecutor) -> Result<Value> {
        let ProfileOperation::Get { detail, listing } = self;
        let path = detail.endpoint();
        match detail {
            ProfileDetail::Saved => saved(executor, *listing).await,
            ProfileDetail::Identity => pluck(fetch(executor, path).await?, "/features", path),
            ProfileDetail::Friends => {
                let response = fetch(executor, path).await?;
                non_empty(response.pointer("/data/children").cloned(), "friends")
            }
            ProfileDetail::Karma => {
                let response = fetch(executor, path).await?;
                non_empty(response.pointer("/data").cloned(), "karma")
            }
            ProfileDetail::Trophies => {
                let trophies = pluck(fetch(executor, path).await?, "/data/trophies", path)?;
                let Value::Array(trophies) = trophies else {
                    return Err(Error::shape(path, "a trophies array"));
                };
                trophies
                    .into_iter()
                    .map(|mut trophy| {
                        trophy
                            .get_mut("data")
                            .map(Value::take)
                            .ok_or_else(|| Error::shape(path, "trophy data"))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            ProfileDetail::BlockedUsers | ProfileDetail::Prefs => fetch(executor, path).await,
        }
    }
}

async fn fetch(executor: &dyn RequestExecutor, path: &str) -> Result<Value> {
    executor.execute(&ApiCall::get(HOST, path)).await
}

/// Saved items need the account name first.
async fn saved(executor: &dyn RequestExecutor, listing: ListingOptions) -> Result<Value> {
    let me = fetch(executor, "api/v1/me").await?;
    let name = me
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::shape("api/v1/me", "an account name"))?;
    debug!("Listing saved items of {name}");

    let call = ApiCall::get(HOST, format!("user/{name}/saved.json"));
    let records = paginate(executor, call, ListingShape::Children, listing).await?;
    Ok(Value::Array(records))
}

fn non_empty(value: Option<Value>, detail: &str) -> Result<Value> {
    match value {
        Some(Value::Array(entries)) if !entries.is_empty() => Ok(Value::Array(entries)),
        _ => Err(Error::EmptyResult {
            detail: detail.to_string(),
        }),
    }
}
