//! In-process JSON-RPC stand-ins for bitcoind and geth.
//!
//! They answer the subset of methods the wallets call, from state the test
//! controls, and record every call for later assertion.

#![allow(dead_code)]

use serde_json::json;
use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};
use tokio::sync::oneshot;
use url::Url;
use warp::Filter;

pub const DEV_ACCOUNT: &str = "0x00a329c0648769a73afac7f9381e08fb43dbea72";
pub const TRANSACTION_HASH: &str =
    "0x3b9bb47410c0b1a56e94f8e0df66a5e04bfd0bee3a1ff95e2b05ee6d64d02765";

const BITCOIN_ADDRESSES: [&str; 2] = [
    "bcrt1qcqslz7lfn34dl096t5uwurff9spen5h4v2pmap",
    "bcrt1qazcfh4q2tml9k4gzpl6tz0d5u0nlv5a7k3w0qy",
];
const ETHEREUM_ACCOUNTS: [&str; 2] = [
    "0xd02c2abb8fb9f3a094cbb838cbda65bec98ef15e",
    "0x8a6a9c0b2c3d4e5f60718293a4b5c6d7e8f90a1b",
];
const BITCOIN_TXID: &str = "ad067ee417ee5518122374307d1fa494c67e30c75d38c7061d944b59e56fe024";

#[derive(Debug, Clone)]
pub struct RpcCall {
    pub path: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Debug)]
pub struct BitcoindState {
    pub chain: String,
    pub balance_btc: f64,
    pub calls: Vec<RpcCall>,
    address_cursor: usize,
}

impl Default for BitcoindState {
    fn default() -> Self {
        Self {
            chain: "regtest".to_owned(),
            balance_btc: 0.0,
            calls: Vec::new(),
            address_cursor: 0,
        }
    }
}

#[derive(Debug)]
pub struct GethState {
    pub net_version: String,
    pub balance_hex: String,
    pub calls: Vec<RpcCall>,
    account_cursor: usize,
}

impl Default for GethState {
    fn default() -> Self {
        Self {
            net_version: "17".to_owned(),
            balance_hex: "0x0".to_owned(),
            calls: Vec::new(),
            account_cursor: 0,
        }
    }
}

pub struct FakeBitcoind {
    url: Url,
    state: Arc<Mutex<BitcoindState>>,
    _shutdown: oneshot::Sender<()>,
}

impl FakeBitcoind {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(BitcoindState::default()));
        let (url, shutdown) = serve(state.clone(), bitcoind_result).await;

        Self {
            url,
            state,
            _shutdown: shutdown,
        }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    pub fn set_balance(&self, btc: f64) {
        self.state.lock().unwrap().balance_btc = btc;
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_of(&self, method: &str) -> Vec<RpcCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }
}

pub struct FakeGeth {
    url: Url,
    state: Arc<Mutex<GethState>>,
    _shutdown: oneshot::Sender<()>,
}

impl FakeGeth {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(GethState::default()));
        let (url, shutdown) = serve(state.clone(), geth_result).await;

        Self {
            url,
            state,
            _shutdown: shutdown,
        }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    pub fn set_balance_hex(&self, hex: &str) {
        self.state.lock().unwrap().balance_hex = hex.to_owned();
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_of(&self, method: &str) -> Vec<RpcCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }
}

type ResultFor<S> =
    fn(&mut S, &str, &str, &serde_json::Value) -> Result<serde_json::Value, serde_json::Value>;

async fn serve<S: Send + 'static>(
    state: Arc<Mutex<S>>,
    result_for: ResultFor<S>,
) -> (Url, oneshot::Sender<()>) {
    let route = warp::post()
        .and(warp::path::full())
        .and(warp::body::json())
        .and(warp::any().map(move || state.clone()))
        .map(
            move |path: warp::path::FullPath, request: serde_json::Value, state: Arc<Mutex<S>>| {
                let method = request["method"].as_str().unwrap_or_default().to_owned();
                let params = request["params"].clone();

                let mut state = state.lock().unwrap();
                let body = match result_for(&mut state, path.as_str(), &method, &params) {
                    Ok(result) => json!({ "id": "1", "result": result, "error": null }),
                    Err(error) => json!({ "id": "1", "result": null, "error": error }),
                };
                drop(state);

                warp::reply::json(&body)
            },
        );

    let (shutdown, rx) = oneshot::channel::<()>();
    let (addr, server) =
        warp::serve(route).bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async {
            rx.await.ok();
        });
    tokio::spawn(server);

    let url = format!("http://{}/", addr).parse().expect("a valid url");
    (url, shutdown)
}

fn bitcoind_result(
    state: &mut BitcoindState,
    path: &str,
    method: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value, serde_json::Value> {
    state.calls.push(RpcCall {
        path: path.to_owned(),
        method: method.to_owned(),
        params: params.clone(),
    });

    match method {
        "getblockchaininfo" => Ok(json!({ "chain": state.chain })),
        "createwallet" => Ok(json!({ "name": params[0], "warning": null })),
        "getnewaddress" => {
            let address = BITCOIN_ADDRESSES[state.address_cursor % BITCOIN_ADDRESSES.len()];
            state.address_cursor += 1;
            Ok(json!(address))
        }
        "getbalance" => Ok(json!(state.balance_btc)),
        "sendtoaddress" => Ok(json!(BITCOIN_TXID)),
        "sendrawtransaction" => Ok(json!(BITCOIN_TXID)),
        other => Err(json!({ "code": -32601, "message": format!("unknown method {}", other) })),
    }
}

fn geth_result(
    state: &mut GethState,
    path: &str,
    method: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value, serde_json::Value> {
    state.calls.push(RpcCall {
        path: path.to_owned(),
        method: method.to_owned(),
        params: params.clone(),
    });

    match method {
        "net_version" => Ok(json!(state.net_version)),
        "eth_accounts" => Ok(json!([DEV_ACCOUNT])),
        "personal_newAccount" => {
            let account = ETHEREUM_ACCOUNTS[state.account_cursor % ETHEREUM_ACCOUNTS.len()];
            state.account_cursor += 1;
            Ok(json!(account))
        }
        "eth_getBalance" => Ok(json!(state.balance_hex)),
        "eth_sendTransaction" | "personal_sendTransaction" => Ok(json!(TRANSACTION_HASH)),
        "eth_getTransactionReceipt" => Ok(json!({
            "contractAddress": "0x1152e1ecd31bed46e7a40bbba32fa219d98b31e6",
            "status": "0x1",
        })),
        other => Err(json!({ "code": -32601, "message": format!("unknown method {}", other) })),
    }
}
