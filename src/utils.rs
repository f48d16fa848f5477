use colored::Colorize;
use once_cell::unsync::OnceCell;
use serde_json::Value;

use crate::error::ClientError;

/// Walk `nested_map` one key at a time and return whatever sits at the end of `path`.
///
/// Fails on the first key that can't be resolved, either because the value we
/// reached is not an object or because the key is not in it. An empty path
/// returns `nested_map` itself.
pub fn access_nested_map<'a>(
    nested_map: &'a Value,
    path: &[&str],
) -> Result<&'a Value, ClientError> {
    path.iter().try_fold(nested_map, |current, key| {
        current
            .as_object()
            .and_then(|map| map.get(*key))
            .ok_or_else(|| ClientError::KeyNotFound(key.to_string()))
    })
}

/// Anything that can turn a URL into a parsed JSON document
pub trait FetchJson {
    fn get_json(&self, url: &str) -> Result<Value, ClientError>;
}

/// Issues blocking GET requests against the GitHub REST API
pub struct HttpJsonFetcher {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl HttpJsonFetcher {
    pub fn new() -> Self {
        Self::with_client(reqwest::blocking::Client::new())
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for HttpJsonFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchJson for HttpJsonFetcher {
    fn get_json(&self, url: &str) -> Result<Value, ClientError> {
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", "GitHub Org Client")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().map_err(|source| {
            println!("{} {}", "I couldn't make the request to".red(), url.white());
            ClientError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
            });
        }

        let content = response.text().map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str::<Value>(&content).map_err(|source| ClientError::Deserialize {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetch `url` with a fresh, unauthenticated fetcher
pub fn get_json(url: &str) -> Result<Value, ClientError> {
    HttpJsonFetcher::new().get_json(url)
}

/// A value computed at most once, on first access, and kept for as long as
/// its owner lives. There is no way to reset it.
#[derive(Debug)]
pub struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The stored value, if it has been computed already
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(f)
    }

    /// Like [`Memo::get_or_init`] but for computations that can fail.
    /// A failure stores nothing, so the next call runs `f` again.
    pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell.get_or_try_init(f)
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}
