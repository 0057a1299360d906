//! [`RemoteStore`] over the dashboard's JSON HTTP API, using blocking [`reqwest`].

use std::time::Duration;

use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    Method, Url,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    domain::{Semester, SemesterDraft, SemesterId, SemesterUpdate, Transaction},
    errors::{DashboardError, Result},
};

use super::RemoteStore;

const REQUEST_ID_HEADER: &str = "X-Request-Id";
const SEMESTERS: &str = "semesters";
const TRANSACTIONS: &str = "transactions";

/// HTTP client for a single dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base: Url,
}

/// Single-record responses arrive wrapped as `{"data": ...}`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// The semester listing is a bare array; some deployments wrap it.
#[derive(Deserialize)]
#[serde(untagged)]
enum SemesterListPayload {
    Bare(Vec<Semester>),
    Wrapped {
        #[serde(alias = "data")]
        semesters: Vec<Semester>,
    },
}

#[derive(Deserialize)]
struct TransactionListPayload {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl HttpRemoteStore {
    /// Creates a client for `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Reuses an existing [`Client`], keeping its connection pool and settings.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|err| {
            DashboardError::Config(format!("invalid backend url `{base_url}`: {err}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "backend url `{base_url}` cannot carry a path"
            )));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends `segments` to the base path. An empty final segment yields a trailing slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DashboardError::Config(format!("backend url `{}` cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        let request_id = Uuid::new_v4();
        debug!(%method, path = url.path(), %request_id, "sending backend request");
        let request = self
            .client
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        let response = build(request).send().map_err(|err| {
            warn!(%method, path = url.path(), %request_id, error = %err, "backend request failed");
            DashboardError::from(err)
        })?;
        Self::ensure_success(response, &method, &url)
    }

    fn ensure_success(response: Response, method: &Method, url: &Url) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        warn!(%method, path = url.path(), status = status.as_u16(), "backend rejected request");
        Err(DashboardError::from_status(status.as_u16(), &body))
    }

    fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text()?;
        decode(&body)
    }
}

impl RemoteStore for HttpRemoteStore {
    fn list_semesters(&self) -> Result<Vec<Semester>> {
        let url = self.endpoint(&[SEMESTERS, ""])?;
        let response = self.send(Method::GET, url, |req| req)?;
        let body = response.text()?;
        decode_semester_list(&body)
    }

    fn create_semester(&self, draft: &SemesterDraft) -> Result<Semester> {
        let url = self.endpoint(&[SEMESTERS, ""])?;
        let response = self.send(Method::POST, url, |req| req.json(draft))?;
        Self::parse::<Envelope<Semester>>(response).map(|envelope| envelope.data)
    }

    fn update_semester(&self, id: &SemesterId, changes: &SemesterUpdate) -> Result<Semester> {
        let url = self.endpoint(&[SEMESTERS, id.as_str()])?;
        let response = self.send(Method::PUT, url, |req| req.json(changes))?;
        Self::parse::<Envelope<Semester>>(response).map(|envelope| envelope.data)
    }

    fn delete_semester(&self, id: &SemesterId) -> Result<()> {
        let url = self.endpoint(&[SEMESTERS, id.as_str()])?;
        self.send(Method::DELETE, url, |req| req)?;
        Ok(())
    }

    fn list_transactions(&self, semester_id: &SemesterId) -> Result<Vec<Transaction>> {
        let url = self.endpoint(&[TRANSACTIONS, ""])?;
        let response = self.send(Method::GET, url, |req| {
            req.query(&[("semester_id", semester_id.as_str())])
        })?;
        Self::parse::<TransactionListPayload>(response).map(|payload| payload.transactions)
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<Transaction> {
        let url = self.endpoint(&[TRANSACTIONS, transaction.id.as_str()])?;
        let response = self.send(Method::PUT, url, |req| req.json(transaction))?;
        Self::parse::<Envelope<Transaction>>(response).map(|envelope| envelope.data)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

pub(crate) fn decode_semester_list(body: &str) -> Result<Vec<Semester>> {
    decode::<SemesterListPayload>(body).map(|payload| match payload {
        SemesterListPayload::Bare(semesters) | SemesterListPayload::Wrapped { semesters } => {
            semesters
        }
    })
}
