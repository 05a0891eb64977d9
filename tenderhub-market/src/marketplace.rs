//! Wiring of the two managers over one context.

use std::sync::Arc;

use crate::bid::BidManager;
use crate::context::MarketContext;
use crate::queries::TenderQueries;
use crate::tender::TenderManager;

/// Both lifecycle managers, sharing one store and cache.
///
/// The bid manager receives the tender manager only as `Arc<dyn TenderQueries>`.
#[derive(Debug, Clone)]
pub struct Marketplace {
    ctx: MarketContext,
    tenders: Arc<TenderManager>,
    bids: Arc<BidManager>,
}

impl Marketplace {
    pub fn new(ctx: MarketContext) -> Self {
        let tenders = Arc::new(TenderManager::new(ctx.clone()));
        let queries: Arc<dyn TenderQueries> = tenders.clone();
        let bids = Arc::new(BidManager::new(ctx.clone(), queries));
        Self { ctx, tenders, bids }
    }

    /// Marketplace over an in-memory store and cache.
    pub fn in_memory() -> Self {
        Self::new(MarketContext::in_memory())
    }

    pub fn tenders(&self) -> &TenderManager {
        &self.tenders
    }

    pub fn bids(&self) -> &BidManager {
        &self.bids
    }

    pub fn context(&self) -> &MarketContext {
        &self.ctx
    }
}
