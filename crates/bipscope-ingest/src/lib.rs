//! Proposal record ingestion for bipscope
//!
//! Loads a corpus of per-proposal JSON exports (one file per BIP) into
//! memory and resolves each record's canonical identifier:
//!
//! - `RawRecord` mirrors the on-disk shape `{ raw: { preamble }, insights }`
//!   with every field optional — malformed or missing fields are carried
//!   through untouched for downstream policy filters, never rejected here.
//! - `ProposalRecord` is a `RawRecord` whose own identifier survived
//!   normalization. Records with no resolvable identifier are dropped.
//! - Cross-reference fields stay as raw `serde_json::Value`s; the graph
//!   builder runs them through [`normalize::normalize_ids`] at edge time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub mod loader;
pub mod normalize;

pub use loader::{load_dir, LoadError};
pub use normalize::normalize_ids;

// ============================================================================
// Raw record shape (on-disk contract)
// ============================================================================

/// One proposal export file, as deserialized. Everything is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub raw: RawBlock,
    #[serde(default)]
    pub insights: Insights,
    /// Pipeline-irrelevant export metadata (contributor counts etc.),
    /// carried through unparsed.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub preamble: Preamble,
}

/// Structured metadata block of a proposal. Categorical fields are kept as
/// raw values: exports occasionally carry numbers or nulls where strings are
/// expected, and the flow builder decides what to do with those.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preamble {
    /// Identifier in loose textual form ("123", "BIP 123", or a number).
    #[serde(default)]
    pub bip: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layer: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: Option<Value>,
    #[serde(default)]
    pub created: Option<String>,
    /// Free-text author entries, usually "Name <contact>". Only
    /// array-valued author fields feed the per-author aggregation.
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub compliance_score: Option<f64>,
    #[serde(default)]
    pub requires: Option<Value>,
    #[serde(default)]
    pub replaces: Option<Value>,
    #[serde(default)]
    pub superseded_by: Option<Value>,
}

/// Derived text-analysis fields attached to a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Insights {
    /// Term → occurrence count for the proposal body.
    #[serde(default)]
    pub word_list: BTreeMap<String, u64>,
    #[serde(default)]
    pub bip_references: Option<Value>,
    #[serde(default)]
    pub dependencies: Option<Value>,
}

// ============================================================================
// Loaded records
// ============================================================================

/// A raw record whose own identifier resolved to canonical numeric-string
/// form. Input order is preserved by the loader; the graph builder depends
/// on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRecord {
    /// Canonical identifier, e.g. `"141"`.
    pub id: String,
    /// The untouched export payload.
    pub record: RawRecord,
}

impl ProposalRecord {
    /// Resolve the record's own identifier; `None` means the record is
    /// unusable and should be skipped.
    pub fn from_raw(record: RawRecord) -> Option<Self> {
        let id = normalize_ids(record.raw.preamble.bip.as_ref())
            .into_iter()
            .next()?;
        Some(ProposalRecord { id, record })
    }

    pub fn preamble(&self) -> &Preamble {
        &self.record.raw.preamble
    }

    pub fn insights(&self) -> &Insights {
        &self.record.insights
    }
}

/// Resolve identifiers for a batch of raw records, dropping the unusable
/// ones. Order is preserved.
pub fn resolve_records(raws: Vec<RawRecord>) -> Vec<ProposalRecord> {
    let mut out = Vec::with_capacity(raws.len());
    for raw in raws {
        match ProposalRecord::from_raw(raw) {
            Some(record) => out.push(record),
            None => tracing::debug!("skipping record with no resolvable identifier"),
        }
    }
    out
}

/// Coerce a loosely-typed preamble value to a display string. Strings pass
/// through, scalars are formatted, null and missing collapse to `None`.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Author entries for a record: only array-valued `author` fields count,
/// matching the per-author aggregation contract.
pub fn author_entries(preamble: &Preamble) -> Vec<String> {
    match &preamble.author {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        _ => Vec::new(),
    }
}
