//! Derived analytics structures for the bipscope dashboard
//!
//! Consumes loaded proposal records and produces the chart-ready payloads:
//!
//! - [`network`]: deduplicated node set plus five typed edge sets
//!   (references, dependencies, requires, replaces, superseded_by)
//! - [`aggregate`]: per-year counts, top authors, term-frequency cloud,
//!   per-layer counts, distinct statuses
//! - [`flow`]: the layer → status → type category flow graph
//!
//! Every builder is a pure function of its input: rerunning on the same
//! records recomputes everything from scratch, with no cross-run state.

pub mod aggregate;
pub mod flow;
pub mod network;

pub use aggregate::{
    counts_per_layer, counts_per_year, distinct_statuses, top_authors, word_cloud, AuthorCount,
    LayerCount, WordCount, YearCount,
};
pub use flow::{build_category_flow, FlowData, FlowLink, FlowNode};
pub use network::{build_network, Link, LinkSets, NetworkData, ProposalNode};
