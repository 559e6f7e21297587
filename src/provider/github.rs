use super::{CiIndicators, FeatureUsage, RepositoryProvider, TreeEntry};
use crate::error::{EvidenceError, EvidenceResult, GradeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Hosting API provider speaking the GitHub REST v3 dialect.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    base_url: String,
    token: Option<String>,
    client: Client,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Option<String>,
    encoding: Option<String>,
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RunsResponse {
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl GitHubProvider {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, GradeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
            client,
            user_agent: format!("repograde/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// GET a repository endpoint. Missing resources come back as `None`.
    fn get(&self, address: &str, endpoint: &str) -> EvidenceResult<Option<Response>> {
        let url = format!("{}/repos/{address}/{endpoint}", self.base_url);
        debug!(%url, "github request");
        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, &self.user_agent);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;
        let status = response.status();
        // 409: empty repository, 410: feature disabled or retired
        if matches!(
            status,
            StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::GONE
        ) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(EvidenceError::Status {
                code: status.as_u16(),
                url,
            });
        }
        Ok(Some(response))
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        address: &str,
        endpoint: &str,
    ) -> EvidenceResult<Option<T>> {
        match self.get(address, endpoint)? {
            Some(response) => response
                .json::<T>()
                .map(Some)
                .map_err(|err| EvidenceError::Decode(format!("{endpoint}: {err}"))),
            None => Ok(None),
        }
    }

    fn get_content(&self, address: &str, endpoint: &str) -> EvidenceResult<Option<String>> {
        let Some(response) = self.get(address, endpoint)? else {
            return Ok(None);
        };
        let value = response
            .json::<serde_json::Value>()
            .map_err(|err| EvidenceError::Decode(format!("{endpoint}: {err}")))?;
        // directories come back as arrays
        if value.is_array() {
            return Ok(None);
        }
        let content = serde_json::from_value::<ContentResponse>(value)
            .map_err(|err| EvidenceError::Decode(format!("{endpoint}: {err}")))?;
        // files over 1 MB carry no inline content
        if content.encoding.as_deref() == Some("none") {
            return match &content.download_url {
                Some(url) => self.get_raw(url).map(Some),
                None => Ok(None),
            };
        }
        decode_content(&content).map(Some)
    }

    fn get_raw(&self, url: &str) -> EvidenceResult<String> {
        debug!(%url, "github raw download");
        let mut request = self.client.get(url).header(USER_AGENT, &self.user_agent);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EvidenceError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Number of items behind a list endpoint, read from the `rel="last"` page
    /// of a one-item-per-page listing.
    fn count_items(&self, address: &str, endpoint: &str) -> EvidenceResult<u64> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let paged = format!("{endpoint}{separator}per_page=1");
        let Some(response) = self.get(address, &paged)? else {
            return Ok(0);
        };
        if let Some(last) = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(last_page)
        {
            return Ok(last);
        }
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(0);
        }
        let items = response
            .json::<Vec<serde_json::Value>>()
            .map_err(|err| EvidenceError::Decode(format!("{endpoint}: {err}")))?;
        Ok(items.len() as u64)
    }

    fn action_runs(&self, address: &str) -> EvidenceResult<u64> {
        Ok(self
            .get_json::<RunsResponse>(address, "actions/runs?per_page=1")?
            .map(|runs| runs.total_count)
            .unwrap_or(0))
    }

    fn issue_activity(&self, address: &str) -> EvidenceResult<bool> {
        let events = self
            .get_json::<Vec<Event>>(address, "events?per_page=100")?
            .unwrap_or_default();
        Ok(events.iter().any(|event| {
            matches!(
                event.kind.as_deref(),
                Some("IssuesEvent") | Some("IssueCommentEvent")
            )
        }))
    }
}

fn decode_content(content: &ContentResponse) -> EvidenceResult<String> {
    let raw = content.content.as_deref().unwrap_or_default();
    match content.encoding.as_deref() {
        Some("base64") | None => {
            let compact = raw
                .chars()
                .filter(|ch| !ch.is_ascii_whitespace())
                .collect::<String>();
            let bytes = STANDARD
                .decode(compact)
                .map_err(|err| EvidenceError::Decode(format!("base64: {err}")))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Some(other) => Err(EvidenceError::Decode(format!(
            "unsupported content encoding {other}"
        ))),
    }
}

fn last_page(link: &str) -> Option<u64> {
    static LAST: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = LAST
        .get_or_init(|| Regex::new(r#"<[^>]*[?&]page=(\d+)[^>]*>\s*;\s*rel="last""#).ok())
        .as_ref()?;
    pattern
        .captures(link)
        .and_then(|captures| captures.get(1))
        .and_then(|page| page.as_str().parse().ok())
}

impl RepositoryProvider for GitHubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn get_file(&self, address: &str, path: &str) -> EvidenceResult<Option<String>> {
        self.get_content(address, &format!("contents/{}", path.trim_start_matches('/')))
    }

    fn list_tree(&self, address: &str) -> EvidenceResult<Vec<TreeEntry>> {
        let Some(listing) = self.get_json::<TreeResponse>(address, "git/trees/HEAD?recursive=1")?
        else {
            return Ok(Vec::new());
        };
        if listing.truncated {
            warn!(address, "tree listing truncated by host; some files are missing");
        }
        Ok(listing
            .tree
            .into_iter()
            .filter_map(|item| match item.kind.as_str() {
                "blob" => Some(TreeEntry::file(&item.path, item.size.unwrap_or(0))),
                "tree" => Some(TreeEntry::dir(&item.path)),
                _ => None,
            })
            .collect())
    }

    fn get_readme(&self, address: &str) -> EvidenceResult<Option<String>> {
        self.get_content(address, "readme")
    }

    fn get_licence(&self, address: &str) -> EvidenceResult<Option<String>> {
        self.get_content(address, "license")
    }

    fn get_commit_count(&self, address: &str) -> EvidenceResult<u64> {
        self.count_items(address, "commits")
    }

    fn get_contributor_count(&self, address: &str) -> EvidenceResult<u64> {
        self.count_items(address, "contributors?anon=1")
    }

    fn get_branch_count(&self, address: &str) -> EvidenceResult<u64> {
        self.count_items(address, "branches")
    }

    fn get_ci_indicators(&self, address: &str) -> EvidenceResult<CiIndicators> {
        Ok(CiIndicators {
            action_runs: self.action_runs(address)?,
        })
    }

    fn get_feature_usage(&self, address: &str) -> EvidenceResult<FeatureUsage> {
        let issue_activity = self.issue_activity(address)?;
        if issue_activity {
            return Ok(FeatureUsage {
                issue_activity,
                ..FeatureUsage::default()
            });
        }
        Ok(FeatureUsage {
            issue_activity,
            workflow_runs: self.action_runs(address)?,
            projects: self.count_items(address, "projects")?,
        })
    }
}
