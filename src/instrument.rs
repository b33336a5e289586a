//! Typed trading-pair layer used by the HTTP surface to validate the
//! `symbol` path/body parameter before it reaches the generic,
//! `String`-keyed [`crate::registry::Registry`].
//!
//! The core engine itself never sees an `Asset`/`Pair` — only the `String`
//! produced by [`Pair::code`] — so adding a non-crypto symbol later is just
//! a matter of configuring the registry with another string, not touching
//! this module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    BTC,
    USD,
    ETH,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Asset::BTC => "BTC",
            Asset::USD => "USD",
            Asset::ETH => "ETH",
        };
        f.write_str(s)
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BTC" => Ok(Asset::BTC),
            "USD" => Ok(Asset::USD),
            "ETH" => Ok(Asset::ETH),
            other => Err(format!("unsupported asset `{other}`")),
        }
    }
}

impl Serialize for Asset {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A trading pair, e.g. `BTC-USD`: the asset you buy/sell over the asset
/// you pay/receive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pair {
    pub base: Asset,
    pub quote: Asset,
}

impl Pair {
    /// The registry symbol for this pair, e.g. `"BTC-USD"`.
    pub fn code(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }

    pub fn crypto_usd(base: Asset) -> Self {
        Pair {
            base,
            quote: Asset::USD,
        }
    }

    pub fn supported() -> &'static [Pair] {
        &[BTC_USD, ETH_USD]
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('-')
            .ok_or_else(|| format!("unsupported symbol `{s}`"))?;
        let pair = Pair {
            base: base.parse().map_err(|_| format!("unsupported symbol `{s}`"))?,
            quote: quote
                .parse()
                .map_err(|_| format!("unsupported symbol `{s}`"))?,
        };
        if Pair::supported().contains(&pair) {
            Ok(pair)
        } else {
            Err(format!("unsupported symbol `{s}`"))
        }
    }
}

impl TryFrom<String> for Pair {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Pair> for String {
    fn from(p: Pair) -> String {
        p.code()
    }
}

pub const BTC_USD: Pair = Pair {
    base: Asset::BTC,
    quote: Asset::USD,
};
pub const ETH_USD: Pair = Pair {
    base: Asset::ETH,
    quote: Asset::USD,
};
