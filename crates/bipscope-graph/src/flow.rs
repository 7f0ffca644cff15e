//! Layer → status → type category flow graph (sankey payload).
//!
//! Each node contributes two weighted transitions, layer→status and
//! status→type, into one shared accumulator keyed by the composite
//! (source, target) label pair. Labels get stable integer indices by
//! first-seen order; the payload carries integer-indexed endpoints.
//!
//! Nodes with an incomplete categorical triple are skipped whole — a
//! diagnostic is logged, never an error.

use crate::network::NetworkData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const UNKNOWN_LAYER: &str = "Unknown Layer";
const UNKNOWN_STATUS: &str = "Unknown Status";
const UNKNOWN_TYPE: &str = "Unknown Type";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

/// Build the category flow graph from the finished node set.
///
/// Effective category values fall back from the node attribute to the
/// "Unknown …" sentinel (empty-after-trim counts as absent). A node whose
/// layer, status, or type still contains "Unknown" is excluded entirely;
/// partial contribution is never allowed.
pub fn build_category_flow(network: &NetworkData) -> FlowData {
    let mut labels = LabelIndex::new();
    let mut pair_order: Vec<(String, String)> = Vec::new();
    let mut pair_weights: HashMap<(String, String), u64> = HashMap::new();

    for node in &network.nodes {
        let layer = effective(node.group.as_deref(), UNKNOWN_LAYER);
        let status = effective(node.status.as_deref(), UNKNOWN_STATUS);
        let kind = effective(node.kind.as_deref(), UNKNOWN_TYPE);

        if layer.contains("Unknown") || status.contains("Unknown") || kind.contains("Unknown") {
            tracing::warn!(
                id = %node.id,
                %layer,
                %status,
                proposal_type = %kind,
                "skipping node with incomplete categorical triple"
            );
            continue;
        }

        labels.intern(&layer);
        labels.intern(&status);
        labels.intern(&kind);

        for pair in [(layer, status.clone()), (status, kind)] {
            match pair_weights.get_mut(&pair) {
                Some(weight) => *weight += 1,
                None => {
                    pair_weights.insert(pair.clone(), 1);
                    pair_order.push(pair);
                }
            }
        }
    }

    let links = pair_order
        .iter()
        .map(|pair| FlowLink {
            source: labels.index_of(&pair.0),
            target: labels.index_of(&pair.1),
            value: pair_weights[pair],
        })
        .collect();

    FlowData {
        nodes: labels.into_nodes(),
        links,
    }
}

fn effective(value: Option<&str>, sentinel: &str) -> String {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => sentinel.to_string(),
    }
}

/// First-seen-order label interner. Indices are dense and stable.
struct LabelIndex {
    order: Vec<String>,
    by_label: HashMap<String, usize>,
}

impl LabelIndex {
    fn new() -> Self {
        LabelIndex {
            order: Vec::new(),
            by_label: HashMap::new(),
        }
    }

    fn intern(&mut self, label: &str) {
        if !self.by_label.contains_key(label) {
            self.by_label.insert(label.to_string(), self.order.len());
            self.order.push(label.to_string());
        }
    }

    fn index_of(&self, label: &str) -> usize {
        self.by_label[label]
    }

    fn into_nodes(self) -> Vec<FlowNode> {
        self.order
            .into_iter()
            .enumerate()
            .map(|(id, name)| FlowNode { id, name })
            .collect()
    }
}
