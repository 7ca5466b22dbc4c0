use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
    url: url::Url,
}

impl Client {
    pub fn new(base_url: url::Url) -> Self {
        Self {
            inner: reqwest::Client::new(),
            url: base_url,
        }
    }

    pub async fn send<Req, Res>(&self, request: Request<Req>) -> anyhow::Result<Res>
    where
        Req: Debug + Serialize,
        Res: Debug + DeserializeOwned,
    {
        self.send_with_path("".into(), request).await
    }

    pub async fn send_with_path<Req, Res>(
        &self,
        path: String,
        request: Request<Req>,
    ) -> anyhow::Result<Res>
    where
        Req: Debug + Serialize,
        Res: Debug + DeserializeOwned,
    {
        let url = self.url.clone().join(&path)?;

        let response = self
            .inner
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(ConnectionFailed)?
            .json::<Response<Res>>()
            .await
            .context("failed to deserialize JSON response as JSON-RPC response")?
            .into_result()
            .with_context(|| {
                format!(
                    "JSON-RPC request {} failed",
                    serde_json::to_string(&request).expect("can always serialize to JSON")
                )
            })?;

        Ok(response)
    }
}

#[derive(serde::Serialize, Debug, Clone)]
pub struct Request<T> {
    id: String,
    jsonrpc: String,
    method: String,
    params: T,
}

impl<T> Request<T> {
    pub fn new(method: &str, params: T, jsonrpc: String) -> Self {
        Self {
            id: "1".to_owned(),
            jsonrpc,
            method: method.to_owned(),
            params,
        }
    }
}

/// A JSON-RPC response envelope.
///
/// bitcoind speaks JSON-RPC 1.0 and always sends both keys with one of them
/// null, geth only sends the key that applies. Two `Option`s cover both.
#[derive(serde::Deserialize, Debug, PartialEq)]
pub struct Response<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

impl<R> Response<R>
where
    R: DeserializeOwned,
{
    pub fn into_result(self) -> anyhow::Result<R> {
        match (self.result, self.error) {
            (_, Some(e)) => Err(e.into()),
            (Some(result), None) => Ok(result),
            // a null result is how geth reports "not yet" on pending
            // queries; Option targets read it as a clean miss
            (None, None) => {
                let value = serde_json::from_value(serde_json::Value::Null)
                    .context("JSON-RPC response carried neither result nor error")?;
                Ok(value)
            }
        }
    }
}

#[derive(Debug, serde::Deserialize, thiserror::Error, PartialEq)]
#[error("JSON-RPC request failed with code {code}: {message}")]
pub struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcError {
    pub fn code(&self) -> i64 {
        self.code
    }
}

#[derive(Debug, thiserror::Error)]
#[error("connection error: {0}")]
pub struct ConnectionFailed(#[from] reqwest::Error);

pub fn serialize<T>(t: T) -> anyhow::Result<serde_json::Value>
where
    T: Serialize,
{
    let value = serde_json::to_value(t).context("failed to serialize parameter")?;

    Ok(value)
}
