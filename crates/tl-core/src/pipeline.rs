//! Pipeline entry: shape detection, dispatch to a builder, chunking, final merge.

use std::num::NonZeroUsize;

use serde::Serialize;
use serde_json::Value;

use crate::employee::EmployeeIndex;
use crate::fields::{FieldIndex, KeyCache};
use crate::merge::merge_spans;
use crate::shape::{BatchShape, RowShape};
use crate::span::Span;
use crate::types::ValidationError;
use crate::{daily, span_rows};

/// Counters collected while building spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Rows in the input batch.
    pub rows: usize,
    /// Rows routed to the span builder.
    pub span_rows: usize,
    /// Rows routed to the daily builder.
    pub daily_rows: usize,
    pub dropped_missing_code: usize,
    pub dropped_missing_date: usize,
    /// Spans emitted by the builders, before merging.
    pub spans_built: usize,
    /// Spans returned to the caller.
    pub spans_out: usize,
}

impl BuildStats {
    pub const fn dropped(&self) -> usize {
        self.dropped_missing_code + self.dropped_missing_date
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Rows handed to a builder per call.
    chunk_size: NonZeroUsize,
    /// Bound for the field-name normalization cache.
    key_cache_capacity: usize,
    /// Whether to merge the concatenated builder output.
    merge: bool,
}

impl BuildOptions {
    /// Default rows per builder call.
    pub const DEFAULT_CHUNK_SIZE: usize = 5_000;

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, ValidationError> {
        self.chunk_size = NonZeroUsize::new(chunk_size).ok_or(ValidationError::ZeroChunkSize)?;
        Ok(self)
    }

    #[must_use]
    pub const fn with_key_cache_capacity(mut self, capacity: usize) -> Self {
        self.key_cache_capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    pub const fn key_cache_capacity(&self) -> usize {
        self.key_cache_capacity
    }

    pub const fn merge(&self) -> bool {
        self.merge
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            chunk_size: NonZeroUsize::new(Self::DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
            key_cache_capacity: KeyCache::DEFAULT_CAPACITY,
            merge: true,
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub spans: Vec<Span>,
    pub shape: BatchShape,
    pub stats: BuildStats,
}

/// Rows indexed once and partitioned by shape.
struct Routed<'a> {
    shape: BatchShape,
    span_rows: Vec<FieldIndex<'a>>,
    daily_rows: Vec<FieldIndex<'a>>,
}

/// Indexes and classifies every row once, then partitions the batch.
fn route<'a>(rows: &'a [Value], cache: &mut KeyCache) -> Routed<'a> {
    let mut span_rows = Vec::new();
    let mut daily_rows = Vec::new();
    for row in rows {
        let fields = FieldIndex::new(row, cache);
        match RowShape::of(&fields) {
            RowShape::Span => span_rows.push(fields),
            RowShape::Daily => daily_rows.push(fields),
        }
    }

    let shape = BatchShape::from_counts(span_rows.len(), daily_rows.len());
    if let BatchShape::Mixed {
        span_rows,
        daily_rows,
    } = shape
    {
        tracing::warn!(
            span_rows,
            daily_rows,
            "batch mixes span and daily rows; routing each to its own builder"
        );
    }

    Routed {
        shape,
        span_rows,
        daily_rows,
    }
}

/// Builds unmerged spans from one batch in a single call.
///
/// The batch shape is detected once; span-shaped and daily rows each go to
/// their own builder. Never fails: unusable rows are dropped.
pub fn build_spans(rows: &[Value], index: &EmployeeIndex, cache: &mut KeyCache) -> Vec<Span> {
    let routed = route(rows, cache);
    let mut stats = BuildStats::default();
    let mut spans = span_rows::build_from_indexed(&routed.span_rows, index, &mut stats);
    spans.extend(daily::build_from_indexed(&routed.daily_rows, index, &mut stats));
    spans
}

/// Chunked build followed by one final merge.
///
/// Owns the key cache; it is cleared at the start of every run so nothing
/// accumulates across unrelated batches.
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: BuildOptions,
    cache: KeyCache,
}

impl Pipeline {
    pub fn new(options: BuildOptions) -> Self {
        let cache = KeyCache::with_capacity(options.key_cache_capacity());
        Self { options, cache }
    }

    /// Runs the pipeline over one batch.
    ///
    /// Rows are fed to the builders `chunk_size` at a time and the partial
    /// results concatenated. When merging is enabled, a final merge joins runs
    /// that a chunk boundary split.
    pub fn run(&mut self, rows: &[Value], index: &EmployeeIndex) -> BuildOutcome {
        self.cache.clear();

        let mut stats = BuildStats {
            rows: rows.len(),
            ..BuildStats::default()
        };

        let routed = route(rows, &mut self.cache);
        stats.span_rows = routed.span_rows.len();
        stats.daily_rows = routed.daily_rows.len();

        let chunk_size = self.options.chunk_size();
        let mut spans = Vec::new();
        for chunk in routed.span_rows.chunks(chunk_size) {
            spans.extend(span_rows::build_from_indexed(chunk, index, &mut stats));
        }
        // Day runs split across chunks are only rejoined by the final merge.
        let daily_chunk_size = if self.options.merge() {
            chunk_size
        } else {
            routed.daily_rows.len().max(1)
        };
        for chunk in routed.daily_rows.chunks(daily_chunk_size) {
            spans.extend(daily::build_from_indexed(chunk, index, &mut stats));
        }

        if self.options.merge() {
            spans = merge_spans(spans);
        }
        stats.spans_out = spans.len();

        tracing::debug!(
            shape = %routed.shape,
            rows = stats.rows,
            dropped_missing_code = stats.dropped_missing_code,
            dropped_missing_date = stats.dropped_missing_date,
            spans_built = stats.spans_built,
            spans_out = stats.spans_out,
            "pipeline run finished"
        );

        BuildOutcome {
            spans,
            shape: routed.shape,
            stats,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}
