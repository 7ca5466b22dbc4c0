//! A thin typed client over the daemon's HTTP surface.
//!
//! Only swap creation, resource fetching and daemon identity have fixed
//! paths; action execution is entirely hypermedia-driven and dispatches
//! whatever [`crate::action::prepare`] built.

use crate::{
    action::PreparedRequest,
    siren,
    swap::{ActionResponseBody, SwapRequestBody},
};
use anyhow::Context;
use reqwest::{header, Response, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
    base_url: Url,
}

/// A non-2xx answer from the daemon, with the problem details it sent.
///
/// Never retried: the polling loops only retry on successful-but-not-yet-
/// matching responses.
#[derive(Debug, thiserror::Error)]
#[error("daemon answered {status}: {title:?}")]
pub struct Problem {
    pub status: StatusCode,
    pub title: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProblemBody {
    title: Option<String>,
    detail: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Info {
    pub id: String,
    pub listen_addresses: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Peer {
    pub id: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PeersResource {
    peers: Vec<Peer>,
}

impl Client {
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /swaps/rfc003`; the returned locator comes from the `Location`
    /// header, resolved against the daemon base URL.
    pub async fn create_swap(&self, body: &SwapRequestBody) -> anyhow::Result<Url> {
        let url = self.base_url.join("swaps/rfc003")?;
        let response = self.inner.post(url).json(body).send().await?;
        let response = into_success(response).await?;

        let location = response
            .headers()
            .get(header::LOCATION)
            .context("daemon did not answer swap creation with a Location header")?
            .to_str()
            .context("Location header is not valid UTF-8")?;

        let swap_url = self.base_url.join(location)?;
        Ok(swap_url)
    }

    pub async fn fetch_swap(&self, swap_url: &Url) -> anyhow::Result<siren::Entity> {
        self.fetch_entity(swap_url.clone()).await
    }

    pub async fn fetch_swaps(&self) -> anyhow::Result<siren::Entity> {
        let url = self.base_url.join("swaps")?;
        self.fetch_entity(url).await
    }

    /// `GET /`: the daemon's peer id and listen addresses.
    pub async fn info(&self) -> anyhow::Result<Info> {
        let response = self.inner.get(self.base_url.clone()).send().await?;
        let response = into_success(response).await?;

        Ok(response.json().await?)
    }

    /// `GET /peers`: the peers the daemon is connected to.
    pub async fn peers(&self) -> anyhow::Result<Vec<Peer>> {
        let url = self.base_url.join("peers")?;
        let response = self.inner.get(url).send().await?;
        let response = into_success(response).await?;

        let resource: PeersResource = response.json().await?;
        Ok(resource.peers)
    }

    /// Dispatch a prepared action request. A non-empty response body is the
    /// ledger action the daemon wants the actor to perform.
    pub async fn execute(
        &self,
        request: PreparedRequest,
    ) -> anyhow::Result<Option<ActionResponseBody>> {
        let mut builder = self.inner.request(request.method, request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let response = into_success(response).await?;

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(None);
        }

        let body = serde_json::from_str(&text)
            .with_context(|| format!("failed to deserialize action response {}", text))?;
        Ok(Some(body))
    }

    pub fn resolve(&self, href: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(href)?)
    }

    async fn fetch_entity(&self, url: Url) -> anyhow::Result<siren::Entity> {
        let response = self.inner.get(url.clone()).send().await?;
        let response = into_success(response).await?;

        let entity = response
            .json()
            .await
            .with_context(|| format!("failed to deserialize {} as a siren entity", url))?;
        Ok(entity)
    }
}

async fn into_success(response: Response) -> Result<Response, Problem> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<ProblemBody>().await.ok();
    let (title, detail) = match body {
        Some(body) => (body.title, body.detail),
        None => (None, None),
    };

    Err(Problem {
        status,
        title,
        detail,
    })
}
