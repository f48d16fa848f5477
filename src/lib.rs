use colored::Colorize;

pub mod client;
pub mod error;
pub mod utils;

pub use client::GithubOrgClient;
pub use error::ClientError;

use utils::HttpJsonFetcher;

pub struct Bootstrap {
    org: String,
    token: Option<String>,
}

impl Bootstrap {
    /// Work out which organization to look at and whether we have a token.
    /// The organization given on the command line wins over GH_ORG.
    pub fn new(org: Option<String>) -> Result<Self, ClientError> {
        let org = match org.or_else(|| std::env::var("GH_ORG").ok()) {
            Some(org) if !org.trim().is_empty() => org,
            _ => return Err(ClientError::MissingConfiguration("GH_ORG")),
        };
        println!("{} {}", "I have organization:".green(), org.white());

        let token = std::env::var("GH_TOKEN").ok().filter(|t| !t.is_empty());
        match &token {
            Some(token) => println!(
                "{} {}...",
                "I have token:".green(),
                token.chars().take(8).collect::<String>()
            ),
            None => println!(
                "{}",
                "There is no GH_TOKEN so I'll make unauthenticated requests.".yellow()
            ),
        }

        Ok(Self { org, token })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn client(&self) -> GithubOrgClient {
        let fetcher = match &self.token {
            Some(token) => HttpJsonFetcher::new().with_token(token),
            None => HttpJsonFetcher::new(),
        };
        GithubOrgClient::with_fetcher(&self.org, fetcher)
    }
}
