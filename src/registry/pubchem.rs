use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::config::LookupConfig;
use crate::models::RecordSource;
use crate::registry::{FetchFailure, LookupError};

const USER_AGENT: &str = concat!("ghs-checkr/", env!("CARGO_PKG_VERSION"));

/// PUG View heading that holds the GHS classification.
pub const SAFETY_HEADING: &str = "Safety and Hazards";

/// A fetched PubChem record.
#[derive(Debug)]
pub struct Record {
    pub cid: u64,
    pub source: RecordSource,
    pub data: Value,
}

/// Client for the PubChem PUG REST and PUG View APIs.
pub struct PubChemClient {
    client: Client,
    base: Url,
}

impl PubChemClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid PubChem base URL '{}'", config.base_url))?;
        if base.cannot_be_a_base() {
            bail!("invalid PubChem base URL '{}'", config.base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base })
    }

    /// Resolve `identifier` (CAS number or name) and fetch its hazard record.
    pub async fn lookup(&self, identifier: &str) -> Result<Record, LookupError> {
        let cid = self
            .resolve_cid(identifier)
            .await
            .map_err(|e| LookupError::failed(identifier, e))?;
        let (data, source) = self
            .fetch_record(cid)
            .await
            .map_err(|e| LookupError::failed(identifier, e))?;

        tracing::debug!(identifier, cid, %source, "fetched record");
        Ok(Record { cid, source, data })
    }

    /// First PubChem CID registered for `identifier`.
    pub async fn resolve_cid(&self, identifier: &str) -> Result<u64, FetchFailure> {
        let data = self
            .get_json(self.cid_url(identifier))
            .await?
            .ok_or(FetchFailure::NotFound)?;
        parse_cid(&data)
    }

    /// The "Safety and Hazards" section of `cid`, or the full record when the
    /// compound has no such section.
    pub async fn fetch_record(&self, cid: u64) -> Result<(Value, RecordSource), FetchFailure> {
        if let Some(data) = self.get_json(self.section_url(cid)).await? {
            return Ok((data, RecordSource::Heading));
        }

        tracing::debug!(cid, "no safety section, fetching full record");
        let data = self
            .get_json(self.record_url(cid))
            .await?
            .ok_or(FetchFailure::NotFound)?;
        Ok((data, RecordSource::FullRecord))
    }

    /// GET a JSON body. `Ok(None)` on 404.
    async fn get_json(&self, url: Url) -> Result<Option<Value>, FetchFailure> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_response(status, &body)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn cid_url(&self, identifier: &str) -> Url {
        self.endpoint(&["rest", "pug", "compound", "name", identifier, "cids", "JSON"])
    }

    fn record_url(&self, cid: u64) -> Url {
        let cid = cid.to_string();
        self.endpoint(&["rest", "pug_view", "data", "compound", &cid, "JSON"])
    }

    fn section_url(&self, cid: u64) -> Url {
        let mut url = self.record_url(cid);
        url.query_pairs_mut().append_pair("heading", SAFETY_HEADING);
        url
    }
}

/// Map a PubChem response to its JSON body. 404 is `Ok(None)` so callers can
/// fall back; any other non-success status is an error.
fn interpret_response(status: StatusCode, body: &str) -> Result<Option<Value>, FetchFailure> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| FetchFailure::Malformed(e.to_string()))
}

/// Extract the first CID from a `cids/JSON` response.
fn parse_cid(data: &Value) -> Result<u64, FetchFailure> {
    let cids = data
        .get("IdentifierList")
        .and_then(|l| l.get("CID"))
        .and_then(Value::as_array)
        .ok_or_else(|| FetchFailure::Malformed("missing IdentifierList.CID".to_string()))?;

    // PubChem answers some unknown names with CID 0.
    match cids.first().and_then(Value::as_u64) {
        Some(0) | None => Err(FetchFailure::NotFound),
        Some(cid) => Ok(cid),
    }
}
