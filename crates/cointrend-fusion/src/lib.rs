//! Data fusion and composite scoring for cointrend.
//!
//! Everything here is pure and synchronous: raw tables come in through
//! [`RawInputs`](cointrend_core::RawInputs), are cleaned per source, then fused
//! into the trending ranking and the date-aligned market/sentiment table.
//! A source that could not be obtained degrades the run instead of failing it.

pub mod align;
pub mod clean;
pub mod error;
pub mod mentions;
pub mod normalize;
pub mod pipeline;
pub mod scoring;
pub mod summary;
pub mod timestamps;

pub use align::{align, align_market_sentiment, Dated};
pub use clean::Cleaned;
pub use error::MalformedRecord;
pub use mentions::{aggregate_mentions, mention_counts};
pub use normalize::normalize;
pub use pipeline::{
    clean_inputs, run_pipeline, CleanTables, PipelineOptions, PipelineReport, SourceReport,
    SourceStatus,
};
pub use scoring::{rank_candidates, score_trending, DEFAULT_TOP_N};
pub use summary::{
    summarize, DailyCount, MentionShare, Summary, SummaryInputs, DEFAULT_SUMMARY_LIMIT,
};
