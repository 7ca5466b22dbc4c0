//! Translate a hypermedia action into a concrete HTTP request.

use crate::siren;
use reqwest::Method;
use url::Url;

/// The fee rate supplied for bitcoin fee fields, in satoshi per weight unit.
pub const BITCOIN_FEE_PER_WU: u64 = 20;

/// What an action field's classification tags tell us to supply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    /// tags ⊇ {"ethereum", "address"}: this actor's Ethereum account.
    EthereumAddress,
    /// tags ⊇ {"bitcoin", "feePerWU"}: the fixed fee-rate constant.
    BitcoinFeePerWu,
    /// tags ⊇ {"bitcoin", "address"}: a fresh receive address from this
    /// actor's Bitcoin wallet.
    BitcoinAddress,
}

/// Classify a field by its tags. Unrecognized combinations yield `None` and
/// the field is omitted from the request; the daemon rejects the request if
/// the field was required.
pub fn classify(field: &siren::Field) -> Option<FieldKind> {
    let tagged = |class: &str| field.class.iter().any(|c| c == class);

    if tagged("ethereum") && tagged("address") {
        Some(FieldKind::EthereumAddress)
    } else if tagged("bitcoin") && tagged("feePerWU") {
        Some(FieldKind::BitcoinFeePerWu)
    } else if tagged("bitcoin") && tagged("address") {
        Some(FieldKind::BitcoinAddress)
    } else {
        None
    }
}

/// A fully-built request, ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("action declares content type {media_type}, only application/json is supported")]
    UnsupportedContentType { media_type: String },
    #[error("action declares invalid method {method}")]
    InvalidMethod { method: String },
    #[error("action href {href} cannot be resolved against {base}")]
    InvalidHref { href: String, base: Url },
}

/// Build the request an action describes, with `data` holding the values
/// collected for its recognized fields.
///
/// GET (the default) encodes the values as a query string on the href with an
/// empty body. Any other method requires a declared content type of exactly
/// `application/json` and sends the values as a JSON body. The content-type
/// check happens before any request is sent.
pub fn prepare(
    base: &Url,
    action: &siren::Action,
    data: serde_json::Map<String, serde_json::Value>,
) -> Result<PreparedRequest, Error> {
    let method = match &action.method {
        None => Method::GET,
        Some(method) => {
            Method::from_bytes(method.as_bytes()).map_err(|_| Error::InvalidMethod {
                method: method.clone(),
            })?
        }
    };

    let mut url = base.join(&action.href).map_err(|_| Error::InvalidHref {
        href: action.href.clone(),
        base: base.clone(),
    })?;

    if method == Method::GET {
        if !data.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &data {
                query.append_pair(name, &query_value(value));
            }
        }

        return Ok(PreparedRequest {
            method,
            url,
            body: None,
        });
    }

    match action.media_type.as_deref() {
        None | Some("application/json") => Ok(PreparedRequest {
            method,
            url,
            body: Some(serde_json::Value::Object(data)),
        }),
        Some(other) => Err(Error::UnsupportedContentType {
            media_type: other.to_owned(),
        }),
    }
}

fn query_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
