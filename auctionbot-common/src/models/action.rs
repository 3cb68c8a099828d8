// File: auctionbot-common/src/models/action.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Payload attached to an inline button and echoed back by the transport when pressed.
///
/// Wire forms: `"<id>"`, `"re_<id>"` and `"re_auction_<id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionToken {
    /// Primary-round claim on an item.
    Claim(i64),
    /// Paid entry into an open re-offer; the id is the re-offer's item.
    ReOfferEntry(i64),
    /// Admin request to open a re-offer for an under-claimed item.
    RequestReOffer(i64),
}

impl ActionToken {
    pub fn item_id(&self) -> i64 {
        match self {
            ActionToken::Claim(id) | ActionToken::ReOfferEntry(id) | ActionToken::RequestReOffer(id) => *id,
        }
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionToken::Claim(id) => write!(f, "{id}"),
            ActionToken::ReOfferEntry(id) => write!(f, "re_{id}"),
            ActionToken::RequestReOffer(id) => write!(f, "re_auction_{id}"),
        }
    }
}

impl FromStr for ActionToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_id = |raw: &str| {
            raw.parse::<i64>()
                .map_err(|_| Error::Parse(format!("Unknown action token '{s}'")))
        };

        // "re_auction_" must be checked before its "re_" prefix.
        if let Some(rest) = s.strip_prefix("re_auction_") {
            Ok(ActionToken::RequestReOffer(parse_id(rest)?))
        } else if let Some(rest) = s.strip_prefix("re_") {
            Ok(ActionToken::ReOfferEntry(parse_id(rest)?))
        } else {
            Ok(ActionToken::Claim(parse_id(s)?))
        }
    }
}

/// An inline button: label shown to the user plus the token sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    pub token: ActionToken,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, token: ActionToken) -> Self {
        Self { label: label.into(), token }
    }
}
