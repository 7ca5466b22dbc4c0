//! An actor drives one side of a swap against its own daemon.
//!
//! The two actors of a swap never share memory; everything they know about
//! each other travels through the daemons, except for the read-only peer
//! discovery and redeem-account lookups during request construction.

use crate::{
    action,
    asset::{self, ether, AssetKind},
    cnd,
    config::Settings,
    expiries,
    identity::LedgerDataProvider,
    ledger, poll,
    swap::{
        Asset, DialInformation, Ledger, SecretHash, SwapProperties, SwapRequestBody, SwapStatus,
    },
    wallet::WalletSet,
};
use anyhow::Context;
use std::collections::HashMap;
use url::Url;

/// Ceiling on what a swap leg may lose to transaction fees, per asset.
fn max_bitcoin_fee() -> ::bitcoin::Amount {
    ::bitcoin::Amount::from_sat(100_000)
}

fn max_ether_fee() -> ether::Amount {
    ether::Amount::from_wei(2_000_000_000_000_000u128)
}

/// A protocol step was invoked before a swap exists for this actor.
///
/// Distinct from a timeout: the step can never succeed, no matter how long
/// we wait.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("no swap has been created by or correlated to this actor")]
pub struct NoSwap;

/// A wallet balance, in the asset's native smallest unit.
#[derive(Clone, Debug, PartialEq)]
pub enum Balance {
    Bitcoin(::bitcoin::Amount),
    Ether(ether::Amount),
}

impl Balance {
    fn zero(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Bitcoin => Balance::Bitcoin(::bitcoin::Amount::ZERO),
            AssetKind::Ether => Balance::Ether(ether::Amount::zero()),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Balance::Bitcoin(amount) => amount.as_sat() == 0,
            Balance::Ether(amount) => *amount == ether::Amount::zero(),
        }
    }
}

fn asset_quantity(asset: &Asset) -> Balance {
    match asset {
        Asset::Bitcoin { quantity } => Balance::Bitcoin(*quantity),
        Asset::Ether { quantity } => Balance::Ether(quantity.clone()),
    }
}

fn asset_kind(asset: &Asset) -> AssetKind {
    match asset {
        Asset::Bitcoin { .. } => AssetKind::Bitcoin,
        Asset::Ether { .. } => AssetKind::Ether,
    }
}

#[derive(Debug)]
pub struct Actor {
    name: String,
    cnd: cnd::Client,
    settings: Settings,
    expiry_profile: expiries::Profile,
    bitcoin_provider: LedgerDataProvider,
    ethereum_provider: LedgerDataProvider,
    wallets: WalletSet,
    most_recent_swap: Option<Url>,
    starting_balances: HashMap<AssetKind, Balance>,
    expected_balance_changes: HashMap<AssetKind, Balance>,
}

impl Actor {
    pub fn new(
        name: impl Into<String>,
        cnd_url: Url,
        settings: Settings,
        expiry_profile: expiries::Profile,
    ) -> Self {
        Self {
            name: name.into(),
            cnd: cnd::Client::new(cnd_url),
            settings,
            expiry_profile,
            bitcoin_provider: LedgerDataProvider::default(),
            ethereum_provider: LedgerDataProvider::default(),
            wallets: WalletSet::default(),
            most_recent_swap: None,
            starting_balances: HashMap::new(),
            expected_balance_changes: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cnd(&self) -> &cnd::Client {
        &self.cnd
    }

    pub fn wallets(&self) -> &WalletSet {
        &self.wallets
    }

    /// The locator of the swap this actor created or correlated, if any.
    pub fn swap_url(&self) -> Option<&Url> {
        self.most_recent_swap.as_ref()
    }

    /// Create a swap with `counterparty` as the responder.
    ///
    /// Unspecified asset kinds fall back to the bitcoin-for-ether default.
    /// Both actors' wallets for both ledgers are initialized (idempotently)
    /// and their starting balances recorded, so the swap outcome can be
    /// asserted afterwards.
    pub async fn send_request(
        &mut self,
        counterparty: &mut Actor,
        alpha: Option<AssetKind>,
        beta: Option<AssetKind>,
    ) -> anyhow::Result<Url> {
        let alpha_kind = alpha.unwrap_or_else(|| {
            tracing::info!("{}: no alpha asset given, defaulting to bitcoin", self.name);
            AssetKind::Bitcoin
        });
        let beta_kind = beta.unwrap_or_else(|| {
            tracing::info!("{}: no beta asset given, defaulting to ether", self.name);
            AssetKind::Ether
        });

        let (alpha_ledger, alpha_asset) = asset::describe(alpha_kind);
        let (beta_ledger, beta_asset) = asset::describe(beta_kind);

        self.ensure_ledger(&alpha_ledger).await?;
        self.ensure_ledger(&beta_ledger).await?;
        counterparty.ensure_ledger(&alpha_ledger).await?;
        counterparty.ensure_ledger(&beta_ledger).await?;

        for asset in &[&alpha_asset, &beta_asset] {
            self.record_starting_balance(asset).await?;
            counterparty.record_starting_balance(asset).await?;
        }
        self.expected_balance_changes
            .insert(beta_kind, asset_quantity(&beta_asset));
        counterparty
            .expected_balance_changes
            .insert(alpha_kind, asset_quantity(&alpha_asset));

        let info = counterparty.cnd.info().await?;
        let peer = DialInformation {
            peer_id: info.id,
            address_hint: info.listen_addresses.into_iter().next(),
        };

        let alpha_ledger_refund_identity = match alpha_ledger {
            Ledger::Ethereum { .. } => Some(self.wallets.ethereum()?.account()),
            Ledger::Bitcoin { .. } => None,
        };
        let beta_ledger_redeem_identity = match beta_ledger {
            Ledger::Ethereum { .. } => Some(counterparty.wallets.ethereum()?.account()),
            Ledger::Bitcoin { .. } => None,
        };

        let expiries = self.expiry_profile.expiries();

        let body = SwapRequestBody {
            alpha_ledger,
            beta_ledger,
            alpha_asset,
            beta_asset,
            alpha_expiry: expiries.alpha,
            beta_expiry: expiries.beta,
            alpha_ledger_refund_identity,
            beta_ledger_redeem_identity,
            peer,
        };

        let swap_url = self.cnd.create_swap(&body).await?;
        tracing::info!("{}: created swap at {}", self.name, swap_url);
        self.most_recent_swap = Some(swap_url.clone());

        Ok(swap_url)
    }

    /// Discover the swap whose communication state carries `hash`, recording
    /// its self-link as this actor's swap.
    ///
    /// The only channel by which a responder learns which swap is theirs.
    pub async fn find_swap_with_secret_hash(
        &mut self,
        hash: SecretHash,
        within: poll::Budget,
    ) -> anyhow::Result<Url> {
        let subject = format!("a swap with secret hash {}", hash);
        let cnd = self.cnd.clone();

        let swap_url = poll::until(within, &subject, || {
            let cnd = cnd.clone();
            async move { swap_with_secret_hash(&cnd, hash).await }
        })
        .await?;

        tracing::info!("{}: correlated swap at {}", self.name, swap_url);
        self.most_recent_swap = Some(swap_url.clone());

        Ok(swap_url)
    }

    /// The secret hash of this actor's swap, once communicated.
    pub async fn secret_hash(&self) -> anyhow::Result<SecretHash> {
        let properties = self.swap_properties().await?;
        let state = properties
            .state
            .context("swap does not expose its state yet")?;

        Ok(state.communication.secret_hash)
    }

    pub async fn status(&self) -> anyhow::Result<SwapStatus> {
        let properties = self.swap_properties().await?;
        Ok(properties.status)
    }

    pub async fn accept(&self, within: poll::Budget) -> anyhow::Result<()> {
        self.do_action("accept", within).await
    }

    pub async fn decline(&self, within: poll::Budget) -> anyhow::Result<()> {
        self.do_action("decline", within).await
    }

    pub async fn fund(&self, within: poll::Budget) -> anyhow::Result<()> {
        self.do_action("fund", within).await
    }

    pub async fn redeem(&self, within: poll::Budget) -> anyhow::Result<()> {
        self.do_action("redeem", within).await
    }

    pub async fn refund(&self, within: poll::Budget) -> anyhow::Result<()> {
        self.do_action("refund", within).await
    }

    /// Fund this actor's wallet with the default quantity of `kind`.
    pub async fn mint(&self, kind: AssetKind) -> anyhow::Result<()> {
        let (_, asset) = asset::describe(kind);
        match asset {
            Asset::Bitcoin { quantity } => self.wallets.bitcoin()?.mint(quantity).await,
            Asset::Ether { quantity } => self.wallets.ethereum()?.mint(quantity).await,
        }
    }

    /// Whether every asset this actor expected to receive has arrived, give
    /// or take the fee ceiling.
    pub async fn has_received_expected_balances(&self) -> anyhow::Result<bool> {
        for (kind, expected) in &self.expected_balance_changes {
            let starting = self
                .starting_balances
                .get(kind)
                .with_context(|| format!("no starting balance recorded for {}", kind))?;
            let current = self.balance(*kind).await?;

            let received = match (starting, expected, current) {
                (Balance::Bitcoin(starting), Balance::Bitcoin(expected), Balance::Bitcoin(current)) => {
                    let target = (*starting + *expected)
                        .checked_sub(max_bitcoin_fee())
                        .unwrap_or(::bitcoin::Amount::ZERO);
                    current >= target
                }
                (Balance::Ether(starting), Balance::Ether(expected), Balance::Ether(current)) => {
                    let target =
                        (starting.clone() + expected.clone()).saturating_sub(&max_ether_fee());
                    current >= target
                }
                _ => anyhow::bail!("recorded balances for {} disagree on the asset", kind),
            };

            if !received {
                return Ok(false);
            }
        }

        Ok(true)
    }

    pub async fn balance(&self, kind: AssetKind) -> anyhow::Result<Balance> {
        let balance = match kind {
            AssetKind::Bitcoin => Balance::Bitcoin(self.wallets.bitcoin()?.balance().await?),
            AssetKind::Ether => Balance::Ether(self.wallets.ethereum()?.balance().await?),
        };

        Ok(balance)
    }

    /// Initialize the provider and wallet for `ledger` if this actor does
    /// not hold them yet. A second initialization keeps the existing wallet
    /// so identities remain stable.
    async fn ensure_ledger(&mut self, leg: &Ledger) -> anyhow::Result<()> {
        match leg.kind() {
            ledger::Kind::Bitcoin => {
                if !self.bitcoin_provider.is_initialized() {
                    let provider = LedgerDataProvider::create(leg, &self.settings).await?;
                    if let LedgerDataProvider::Bitcoin(wallet) = &provider {
                        self.wallets.bitcoin = Some(wallet.clone());
                    }
                    self.bitcoin_provider = provider;
                }
            }
            ledger::Kind::Ethereum => {
                if !self.ethereum_provider.is_initialized() {
                    let provider = LedgerDataProvider::create(leg, &self.settings).await?;
                    if let LedgerDataProvider::Ethereum(wallet) = &provider {
                        self.wallets.ethereum = Some(wallet.clone());
                    }
                    self.ethereum_provider = provider;
                }
            }
        }

        Ok(())
    }

    async fn record_starting_balance(&mut self, asset: &Asset) -> anyhow::Result<()> {
        let kind = asset_kind(asset);
        let balance = if asset_quantity(asset).is_zero() {
            Balance::zero(kind)
        } else {
            self.balance(kind).await?
        };
        self.starting_balances.insert(kind, balance);

        Ok(())
    }

    async fn swap_properties(&self) -> anyhow::Result<SwapProperties> {
        let swap_url = self.most_recent_swap.as_ref().ok_or(NoSwap)?;
        let entity = self.cnd.fetch_swap(swap_url).await?;

        entity.properties_as()
    }

    /// Poll the swap until it offers the named action, then dispatch it and
    /// perform whatever ledger action the daemon answers with.
    async fn do_action(&self, name: &str, within: poll::Budget) -> anyhow::Result<()> {
        let swap_url = self.most_recent_swap.clone().ok_or(NoSwap)?;
        let subject = format!("{} action on {}", name, swap_url);
        let cnd = self.cnd.clone();

        let action = poll::until(within, &subject, || {
            let cnd = cnd.clone();
            let swap_url = swap_url.clone();
            let name = name.to_owned();
            async move {
                let entity = cnd.fetch_swap(&swap_url).await?;
                Ok(entity.action_by_name(&name).cloned())
            }
        })
        .await?;

        let mut data = serde_json::Map::new();
        for field in &action.fields {
            if let Some(kind) = action::classify(field) {
                data.insert(field.name.clone(), self.wallets.resolve(kind).await?);
            }
        }

        let request = action::prepare(self.cnd.base_url(), &action, data)?;
        if let Some(instruction) = self.cnd.execute(request).await? {
            self.wallets.execute(instruction).await?;
        }

        tracing::info!("{}: executed {} on {}", self.name, name, swap_url);

        Ok(())
    }
}

async fn swap_with_secret_hash(
    cnd: &cnd::Client,
    hash: SecretHash,
) -> anyhow::Result<Option<Url>> {
    let collection = cnd.fetch_swaps().await?;

    for sub_entity in &collection.entities {
        let link = match sub_entity.entity.link_by_rel("self") {
            Some(link) => link,
            None => continue,
        };
        let swap_url = cnd.resolve(&link.href)?;
        let swap = cnd.fetch_swap(&swap_url).await?;
        let properties: SwapProperties = swap.properties_as()?;

        if let Some(state) = properties.state {
            if state.communication.secret_hash == hash {
                return Ok(Some(swap_url));
            }
        }
    }

    Ok(None)
}
