//! Collection engine: aggregation, ranking, scheduling and publication.
//!
//! Everything here talks to the ledger only through [`crate::port::MarketData`].

pub mod aggregator;
pub mod collector;
pub mod ranker;
pub mod snapshot;

pub use aggregator::{MarketVolumes, VolumeAggregator};
pub use collector::{Collector, CollectorHandle, CycleOutcome};
pub use ranker::{MarketRanker, RankedMarket, RankingRules};
pub use snapshot::SnapshotStore;
