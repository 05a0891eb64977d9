//! Typed cache keys.
//!
//! `CacheKey` has a private inner enum, so a key can only be built through the
//! constructors below. Every read path and every invalidation therefore agree on the
//! exact string used for a given view.

use std::fmt;
use tenderhub_core::{BidId, EntityType, TenderId};

const TENDER_COLLECTION: &str = "tenders_cache";
const BID_COLLECTION_PREFIX: &str = "bids_tender_";
const BID_PREFIX: &str = "bid_";
const BID_TENDER_INFIX: &str = "_tender_";

/// A cache key for one cached view.
///
/// # String Format
///
/// - all tenders: `tenders_cache`
/// - bids of a tender: `bids_tender_{tender_id}`
/// - a single bid: `bid_{bid_id}_tender_{tender_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    inner: KeyInner,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyInner {
    TenderCollection,
    BidCollection { tender_id: TenderId },
    Bid { bid_id: BidId, tender_id: TenderId },
}

impl CacheKey {
    /// Key for the list of all tenders.
    pub fn tender_collection() -> Self {
        Self {
            inner: KeyInner::TenderCollection,
        }
    }

    /// Key for the list of bids placed against a tender.
    pub fn bid_collection(tender_id: TenderId) -> Self {
        Self {
            inner: KeyInner::BidCollection { tender_id },
        }
    }

    /// Key for a single bid looked up under its tender.
    pub fn bid(bid_id: BidId, tender_id: TenderId) -> Self {
        Self {
            inner: KeyInner::Bid { bid_id, tender_id },
        }
    }

    /// Entity type of the cached value.
    pub fn entity_type(&self) -> EntityType {
        match self.inner {
            KeyInner::TenderCollection => EntityType::Tender,
            KeyInner::BidCollection { .. } | KeyInner::Bid { .. } => EntityType::Bid,
        }
    }

    /// Tender the cached view is scoped to, if any.
    pub fn tender_id(&self) -> Option<TenderId> {
        match self.inner {
            KeyInner::TenderCollection => None,
            KeyInner::BidCollection { tender_id } | KeyInner::Bid { tender_id, .. } => {
                Some(tender_id)
            }
        }
    }

    /// Low-cardinality label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self.inner {
            KeyInner::TenderCollection => "tender_collection",
            KeyInner::BidCollection { .. } => "bid_collection",
            KeyInner::Bid { .. } => "bid",
        }
    }

    /// Encode to the string stored in the backend.
    pub fn encode(&self) -> String {
        match self.inner {
            KeyInner::TenderCollection => TENDER_COLLECTION.to_string(),
            KeyInner::BidCollection { tender_id } => {
                format!("{BID_COLLECTION_PREFIX}{tender_id}")
            }
            KeyInner::Bid { bid_id, tender_id } => {
                format!("{BID_PREFIX}{bid_id}{BID_TENDER_INFIX}{tender_id}")
            }
        }
    }

    /// Decode a key previously produced by [`CacheKey::encode`].
    ///
    /// Returns `None` for any string that is not a well-formed key.
    pub fn decode(encoded: &str) -> Option<Self> {
        if encoded == TENDER_COLLECTION {
            return Some(Self::tender_collection());
        }
        if let Some(rest) = encoded.strip_prefix(BID_COLLECTION_PREFIX) {
            let tender_id = rest.parse::<TenderId>().ok()?;
            return Some(Self::bid_collection(tender_id));
        }
        if let Some(rest) = encoded.strip_prefix(BID_PREFIX) {
            let (bid_part, tender_part) = rest.split_once(BID_TENDER_INFIX)?;
            let bid_id = bid_part.parse::<BidId>().ok()?;
            let tender_id = tender_part.parse::<TenderId>().ok()?;
            return Some(Self::bid(bid_id, tender_id));
        }
        None
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_key() -> impl Strategy<Value = CacheKey> {
        prop_oneof![
            Just(CacheKey::tender_collection()),
            any::<i64>().prop_map(|t| CacheKey::bid_collection(TenderId::new(t))),
            (any::<i64>(), any::<i64>())
                .prop_map(|(b, t)| CacheKey::bid(BidId::new(b), TenderId::new(t))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_decode_inverts_encode(key in any_key()) {
            prop_assert_eq!(CacheKey::decode(&key.encode()), Some(key));
        }

        #[test]
        fn prop_distinct_keys_encode_distinctly(a in any_key(), b in any_key()) {
            prop_assert_eq!(a == b, a.encode() == b.encode());
        }
    }
}
