//! An in-process stand-in for the swap daemon's HTTP API.
//!
//! Serves the same Siren documents and problem responses the real daemon
//! does, from state the test controls, and records every request a client
//! dispatches at it.

#![allow(dead_code)]

use cnd_harness::swap::SwapRequestBody;
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::sync::oneshot;
use url::Url;
use warp::{
    http::{Response, StatusCode},
    Filter,
};

pub const PEER_ID: &str = "QmRsJtNEdvqrpX9MPxLrrQGvGfuNAoLBQBZayHUuVoeKiv";
pub const LISTEN_ADDRESS: &str = "/ip4/127.0.0.1/tcp/9939";

#[derive(Debug)]
pub struct State {
    pub peer_id: String,
    pub listen_addresses: Vec<String>,
    pub peers: Vec<serde_json::Value>,
    pub swaps: Vec<FakeSwap>,
    pub created_swap_bodies: Vec<serde_json::Value>,
    pub executed: Vec<ExecutedAction>,
    next_id: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            peer_id: PEER_ID.to_owned(),
            listen_addresses: vec![LISTEN_ADDRESS.to_owned()],
            peers: Vec::new(),
            swaps: Vec::new(),
            created_swap_bodies: Vec::new(),
            executed: Vec::new(),
            next_id: 0,
        }
    }
}

#[derive(Debug)]
pub struct FakeSwap {
    pub id: String,
    pub properties: serde_json::Value,
    pub actions: Vec<TimedAction>,
    pub created_at: Instant,
}

/// An action the swap starts advertising `available_after` its creation.
#[derive(Debug)]
struct TimedAction {
    action: serde_json::Value,
    available_after: Duration,
    response: Option<serde_json::Value>,
}

/// Description of an action a fake swap should offer; the href is derived
/// from the swap id once the swap exists.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    name: String,
    method: Option<String>,
    media_type: Option<String>,
    fields: Vec<serde_json::Value>,
    available_after: Duration,
    response: Option<serde_json::Value>,
}

impl ActionSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            method: None,
            media_type: None,
            fields: Vec::new(),
            available_after: Duration::from_secs(0),
            response: None,
        }
    }

    pub fn post_json(mut self) -> Self {
        self.method = Some("POST".to_owned());
        self.media_type = Some("application/json".to_owned());
        self
    }

    pub fn with_field(mut self, name: &str, class: &[&str]) -> Self {
        self.fields.push(json!({
            "name": name,
            "class": class,
            "type": "text",
        }));
        self
    }

    pub fn available_after(mut self, delay: Duration) -> Self {
        self.available_after = delay;
        self
    }

    pub fn responds_with(mut self, payload: serde_json::Value) -> Self {
        self.response = Some(payload);
        self
    }

    fn into_timed(self, swap_id: &str) -> TimedAction {
        let mut action = json!({
            "name": self.name,
            "href": format!("/swaps/rfc003/{}/{}", swap_id, self.name),
            "fields": self.fields,
        });
        if let Some(method) = self.method {
            action["method"] = json!(method);
        }
        if let Some(media_type) = self.media_type {
            action["type"] = json!(media_type);
        }

        TimedAction {
            action,
            available_after: self.available_after,
            response: self.response,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutedAction {
    pub swap_id: String,
    pub name: String,
    pub query: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl State {
    pub fn add_swap(&mut self, secret_hash: &str, actions: Vec<ActionSpec>) -> String {
        let id = format!("aaaaaaaa-aaaa-4aaa-9aaa-{:012x}", self.next_id);
        self.next_id += 1;

        let actions = actions
            .into_iter()
            .map(|spec| spec.into_timed(&id))
            .collect();

        self.swaps.push(FakeSwap {
            id: id.clone(),
            properties: swap_properties(secret_hash),
            actions,
            created_at: Instant::now(),
        });

        id
    }

    /// Attach further actions to an existing swap, e.g. after the
    /// counterparty accepted.
    pub fn add_actions(&mut self, swap_id: &str, actions: Vec<ActionSpec>) {
        let swap = self
            .swaps
            .iter_mut()
            .find(|swap| swap.id == swap_id)
            .expect("swap to exist");

        swap.actions
            .extend(actions.into_iter().map(|spec| spec.into_timed(swap_id)));
    }
}

/// The swap properties document the daemon serves, with the given secret
/// hash in the communication state.
pub fn swap_properties(secret_hash: &str) -> serde_json::Value {
    json!({
        "role": "Alice",
        "counterparty": PEER_ID,
        "protocol": "rfc003",
        "status": "IN_PROGRESS",
        "state": {
            "communication": {
                "status": "SENT",
                "secret_hash": secret_hash,
                "alpha_expiry": 2_000_000_000u32,
                "beta_expiry": 1_999_996_400u32,
            },
            "alpha_ledger": { "status": "NOT_DEPLOYED" },
            "beta_ledger": { "status": "NOT_DEPLOYED" },
        }
    })
}

pub struct FakeCnd {
    addr: SocketAddr,
    url: Url,
    state: Arc<Mutex<State>>,
    shutdown: oneshot::Sender<()>,
}

impl FakeCnd {
    pub async fn start() -> Self {
        Self::start_with(None, Arc::new(Mutex::new(State::default()))).await
    }

    /// Bind to `addr` if given, otherwise to an ephemeral port. Passing the
    /// address and state of a stopped instance back in simulates a daemon
    /// restart that kept its database.
    pub async fn start_with(addr: Option<SocketAddr>, state: Arc<Mutex<State>>) -> Self {
        let (shutdown, rx) = oneshot::channel::<()>();

        let bind_to = addr.unwrap_or_else(|| ([127, 0, 0, 1], 0).into());
        let (addr, server) =
            warp::serve(routes(state.clone())).bind_with_graceful_shutdown(bind_to, async {
                rx.await.ok();
            });
        tokio::spawn(server);

        let url = format!("http://{}/", addr).parse().expect("a valid url");

        Self {
            addr,
            url,
            state,
            shutdown,
        }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    pub fn state(&self) -> Arc<Mutex<State>> {
        self.state.clone()
    }

    pub fn add_swap(&self, secret_hash: &str, actions: Vec<ActionSpec>) -> String {
        self.state.lock().unwrap().add_swap(secret_hash, actions)
    }

    pub fn add_actions(&self, swap_id: &str, actions: Vec<ActionSpec>) {
        self.state.lock().unwrap().add_actions(swap_id, actions)
    }

    pub fn add_peer(&self, id: &str, endpoints: &[&str]) {
        self.state.lock().unwrap().peers.push(json!({
            "id": id,
            "endpoints": endpoints,
        }));
    }

    pub fn executed_actions(&self) -> Vec<ExecutedAction> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn created_swap_bodies(&self) -> Vec<serde_json::Value> {
        self.state.lock().unwrap().created_swap_bodies.clone()
    }

    /// Shut the server down, handing back what a restarted instance needs.
    pub async fn stop(self) -> (SocketAddr, Arc<Mutex<State>>) {
        let Self {
            addr,
            state,
            shutdown,
            ..
        } = self;

        shutdown.send(()).ok();
        // give the socket a moment to actually close
        tokio::time::sleep(Duration::from_millis(50)).await;

        (addr, state)
    }
}

type Shared = Arc<Mutex<State>>;

fn with_state(state: Shared) -> impl Filter<Extract = (Shared,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn routes(
    state: Shared,
) -> impl Filter<Extract = (Response<String>,), Error = warp::Rejection> + Clone {
    let info = warp::get()
        .and(warp::path::end())
        .and(with_state(state.clone()))
        .map(get_info);

    let swaps = warp::get()
        .and(warp::path!("swaps"))
        .and(with_state(state.clone()))
        .map(get_swaps);

    let peers = warp::get()
        .and(warp::path!("peers"))
        .and(with_state(state.clone()))
        .map(get_peers);

    let swap = warp::get()
        .and(warp::path!("swaps" / "rfc003" / String))
        .and(with_state(state.clone()))
        .map(get_swap);

    let create = warp::post()
        .and(warp::path!("swaps" / "rfc003"))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .map(post_swap);

    let act_get = warp::get()
        .and(warp::path!("swaps" / "rfc003" / String / String))
        .and(
            warp::query::raw()
                .map(Some)
                .or_else(|_| async { Ok::<(Option<String>,), Infallible>((None,)) }),
        )
        .and(with_state(state.clone()))
        .map(|id, name, query, state| dispatch_action(id, name, query, None, state));

    let act_post = warp::post()
        .and(warp::path!("swaps" / "rfc003" / String / String))
        .and(warp::body::json())
        .and(with_state(state))
        .map(|id, name, body: serde_json::Value, state| {
            dispatch_action(id, name, None, Some(body), state)
        });

    info.or(swaps)
        .unify()
        .or(peers)
        .unify()
        .or(swap)
        .unify()
        .or(create)
        .unify()
        .or(act_get)
        .unify()
        .or(act_post)
        .unify()
}

fn get_info(state: Shared) -> Response<String> {
    let state = state.lock().unwrap();

    json_response(
        StatusCode::OK,
        json!({
            "id": state.peer_id,
            "listen_addresses": state.listen_addresses,
        }),
    )
}

fn get_peers(state: Shared) -> Response<String> {
    let state = state.lock().unwrap();

    json_response(StatusCode::OK, json!({ "peers": state.peers }))
}

fn get_swaps(state: Shared) -> Response<String> {
    let state = state.lock().unwrap();

    let entities: Vec<serde_json::Value> = state
        .swaps
        .iter()
        .map(|swap| {
            json!({
                "class": ["swap"],
                "rel": ["item"],
                "links": [{ "rel": ["self"], "href": format!("/swaps/rfc003/{}", swap.id) }],
            })
        })
        .collect();

    json_response(
        StatusCode::OK,
        json!({
            "class": ["swaps"],
            "entities": entities,
        }),
    )
}

fn get_swap(id: String, state: Shared) -> Response<String> {
    let state = state.lock().unwrap();

    let swap = match state.swaps.iter().find(|swap| swap.id == id) {
        Some(swap) => swap,
        None => return problem(StatusCode::NOT_FOUND, "Swap not found."),
    };

    let actions: Vec<&serde_json::Value> = swap
        .actions
        .iter()
        .filter(|timed| swap.created_at.elapsed() >= timed.available_after)
        .map(|timed| &timed.action)
        .collect();

    json_response(
        StatusCode::OK,
        json!({
            "class": ["swap"],
            "properties": swap.properties,
            "links": [{ "rel": ["self"], "href": format!("/swaps/rfc003/{}", swap.id) }],
            "actions": actions,
        }),
    )
}

fn post_swap(body: serde_json::Value, state: Shared) -> Response<String> {
    if serde_json::from_value::<SwapRequestBody>(body.clone()).is_err() {
        return problem(StatusCode::BAD_REQUEST, "Invalid body.");
    }

    let mut state = state.lock().unwrap();
    state.created_swap_bodies.push(body);

    let secret_hash = format!("{:064x}", state.next_id);
    let id = state.add_swap(&secret_hash, vec![]);

    Response::builder()
        .status(StatusCode::CREATED)
        .header("Location", format!("/swaps/rfc003/{}", id))
        .body(String::new())
        .expect("a valid response")
}

fn dispatch_action(
    id: String,
    name: String,
    query: Option<String>,
    body: Option<serde_json::Value>,
    state: Shared,
) -> Response<String> {
    let mut state = state.lock().unwrap();

    let swap = match state.swaps.iter().find(|swap| swap.id == id) {
        Some(swap) => swap,
        None => return problem(StatusCode::NOT_FOUND, "Swap not found."),
    };

    let timed = swap
        .actions
        .iter()
        .filter(|timed| swap.created_at.elapsed() >= timed.available_after)
        .find(|timed| timed.action["name"] == name.as_str());
    let response = match timed {
        Some(timed) => timed.response.clone(),
        None => return problem(StatusCode::NOT_FOUND, "Action not available."),
    };

    state.executed.push(ExecutedAction {
        swap_id: id,
        name,
        query,
        body,
    });

    match response {
        Some(payload) => json_response(StatusCode::OK, payload),
        None => Response::builder()
            .status(StatusCode::OK)
            .body(String::new())
            .expect("a valid response"),
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<String> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .expect("a valid response")
}

fn problem(status: StatusCode, title: &str) -> Response<String> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/problem+json")
        .body(json!({ "title": title }).to_string())
        .expect("a valid response")
}
