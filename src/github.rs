//! Client for the GitHub endpoints serving raw keys, profiles and user search.
use crate::{USER_AGENT, key::AuthorizedKey, username::Username};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

const API_VERSION: &str = "2022-11-28";
const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Number of results requested from the search endpoint.
const SEARCH_PAGE_SIZE: u8 = 10;

/// A `Result` alias where the `Err` case is a GitHub [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur when talking to GitHub.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),
    #[error("GitHub returned status {0}")]
    Status(StatusCode),
    #[error("response body is invalid")]
    MalformedResponse,
    #[error("connection error occurred")]
    Connection,
}

/// Conversion for reqwest errors raised below the status code layer.
/// Connect errors, timeouts and everything else the transport can produce
/// are reported uniformly as connection errors.
impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() || error.is_body() {
            Error::MalformedResponse
        } else {
            Error::Connection
        }
    }
}

/// A GitHub user profile.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    // Search results omit the repository count.
    #[serde(default)]
    pub public_repos: u64,
}

impl User {
    /// The name to show for this user, falling back to the login.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// The response of the user search endpoint.
#[derive(Debug, Deserialize)]
pub struct UserSearch {
    pub total_count: u64,
    pub items: Vec<User>,
}

/// Client for the GitHub endpoints the program consumes.
#[derive(Debug)]
pub struct Github {
    /// The base URL serving raw `<username>.keys` documents.
    keys_url: Url,
    /// The base URL of the REST API.
    api_url: Url,
    client: Client,
}

impl Github {
    #[must_use]
    pub fn new(keys_url: Url, api_url: Url) -> Self {
        Self {
            keys_url,
            api_url,
            client: base_client(),
        }
    }

    /// Get a users public SSH keys from the raw keys endpoint.
    ///
    /// Lines that do not look like a public key are dropped from the result.
    pub async fn keys(&self, username: &Username) -> Result<Vec<AuthorizedKey>> {
        let url = self.keys_url.join(&format!("/{username}.keys")).unwrap();
        trace!(%url, "Requesting public keys");
        let response = self.client.get(url).send().await?;

        let body = match response.status() {
            StatusCode::OK => response.text().await?,
            StatusCode::NOT_FOUND => return Err(Error::UserNotFound(username.to_string())),
            status => return Err(Error::Status(status)),
        };

        Ok(parse_keys(&body))
    }

    /// Get a users profile.
    // [API documentation](https://docs.github.com/en/rest/users/users#get-a-user)
    pub async fn user(&self, username: &Username) -> Result<User> {
        let url = self.api_url.join(&format!("/users/{username}")).unwrap();
        let response = self.api_request(url).await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(Error::UserNotFound(username.to_string())),
            status => Err(Error::Status(status)),
        }
    }

    /// Search users matching a free text query.
    // [API documentation](https://docs.github.com/en/rest/search/search#search-users)
    pub async fn search(&self, query: &str) -> Result<UserSearch> {
        let mut url = self.api_url.join("/search/users").unwrap();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("per_page", &SEARCH_PAGE_SIZE.to_string());
        let response = self.api_request(url).await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => Err(Error::Status(status)),
        }
    }

    async fn api_request(&self, url: Url) -> Result<Response> {
        trace!(%url, "Sending request to the GitHub API");
        let request = self
            .client
            .get(url)
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION);

        Ok(request.send().await?)
    }
}

/// Filter a raw keys document down to recognized key lines.
fn parse_keys(body: &str) -> Vec<AuthorizedKey> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.parse() {
            Ok(key) => Some(key),
            Err(err) => {
                debug!(line, %err, "Dropping unrecognized key line");
                None
            }
        })
        .collect()
}

/// The reqwest Client used for all requests.
fn base_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(10))
        .use_rustls_tls()
        .build()
        .unwrap()
}
