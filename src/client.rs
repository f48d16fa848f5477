use colored::Colorize;
use serde_json::Value;

use crate::{
    error::ClientError,
    utils::{access_nested_map, FetchJson, HttpJsonFetcher, Memo},
};

pub const ORG_URL: &str = "https://api.github.com/orgs";

/// Read-only view of a single GitHub organization.
///
/// The organization document and its repository listing are each fetched at
/// most once per client and reused afterwards.
pub struct GithubOrgClient<F = HttpJsonFetcher> {
    org_name: String,
    fetcher: F,
    org: Memo<Value>,
    repos_payload: Memo<Value>,
}

impl GithubOrgClient<HttpJsonFetcher> {
    pub fn new(org_name: impl Into<String>) -> Self {
        Self::with_fetcher(org_name, HttpJsonFetcher::new())
    }
}

impl<F: FetchJson> GithubOrgClient<F> {
    pub fn with_fetcher(org_name: impl Into<String>, fetcher: F) -> Self {
        Self {
            org_name: org_name.into(),
            fetcher,
            org: Memo::new(),
            repos_payload: Memo::new(),
        }
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn org_url(&self) -> String {
        format!("{ORG_URL}/{}", urlencoding::encode(&self.org_name))
    }

    /// The organization document
    pub fn org(&self) -> Result<&Value, ClientError> {
        self.org.get_or_try_init(|| {
            println!(
                "{} {}",
                "I'm going to fetch the organization".yellow(),
                self.org_name.white()
            );
            self.fetcher.get_json(&self.org_url())
        })
    }

    /// Where the organization's repositories are listed
    pub fn public_repos_url(&self) -> Result<&str, ClientError> {
        access_nested_map(self.org()?, &["repos_url"])?
            .as_str()
            .ok_or_else(|| ClientError::UnexpectedShape {
                what: format!("repos_url of {}", self.org_name),
                expected: "a string",
            })
    }

    /// The raw repository listing
    pub fn repos_payload(&self) -> Result<&[Value], ClientError> {
        let payload = self.repos_payload.get_or_try_init(|| {
            let url = self.public_repos_url()?;
            println!("{} {}", "I'm going to fetch repositories from".yellow(), url.white());
            self.fetcher.get_json(url)
        })?;

        payload
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ClientError::UnexpectedShape {
                what: format!("the repositories of {}", self.org_name),
                expected: "an array",
            })
    }

    /// Names of the organization's repositories, in the order GitHub lists them.
    /// With a license key, only repositories declaring exactly that license are kept.
    pub fn public_repos(&self, license: Option<&str>) -> Result<Vec<String>, ClientError> {
        let repos = self
            .repos_payload()?
            .iter()
            .filter(|repo| license.map_or(true, |key| Self::has_license(repo, key)))
            .map(|repo| {
                access_nested_map(repo, &["name"])?
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ClientError::UnexpectedShape {
                        what: "repository name".to_string(),
                        expected: "a string",
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        println!("{} {}", "Success! I found:".green(), repos.len());
        Ok(repos)
    }

    /// Whether `repo` declares `license_key`. A repository without a
    /// license never matches.
    pub fn has_license(repo: &Value, license_key: &str) -> bool {
        access_nested_map(repo, &["license", "key"])
            .ok()
            .and_then(Value::as_str)
            .is_some_and(|key| key == license_key)
    }
}
