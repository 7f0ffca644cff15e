//! Proposal dependency network construction.
//!
//! One deterministic pass over the loaded records builds a deduplicated
//! node set and five typed edge sets. Edge targets are resolved against the
//! identifiers seen *so far* (the current record included), so a reference
//! to a proposal that appears later in the input is dropped. The loader's
//! sorted path order makes this reproducible; the behavior itself is kept
//! for byte-compatibility with the existing dashboard payloads.

use bipscope_ingest::{author_entries, normalize_ids, value_to_string, ProposalRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One proposal in the network. Field names are the dashboard contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalNode {
    pub id: String,
    /// The proposal's layer classification.
    pub group: Option<String>,
    pub compliance_score: Option<f64>,
    pub created: Option<String>,
    pub author: Vec<String>,
    pub word_list: BTreeMap<String, u64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A directed edge with unit weight. Identical (source, target) pairs are
/// kept as parallel edges; consumers decide whether to sum them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: u64,
}

/// The five typed edge sets, keyed by relationship kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkSets {
    pub references: Vec<Link>,
    pub dependencies: Vec<Link>,
    pub requires: Vec<Link>,
    pub replaces: Vec<Link>,
    pub superseded_by: Vec<Link>,
}

/// Complete network payload consumed by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub nodes: Vec<ProposalNode>,
    pub links: LinkSets,
}

/// Build the dependency network from loaded records, in input order.
///
/// First occurrence of an identifier wins the node slot; later duplicates
/// are not merged, but still contribute edges sourced at the shared
/// identifier. Self-loops are permitted. Targets not yet seen are dropped
/// silently per the dangling-reference policy.
pub fn build_network(records: &[ProposalRecord]) -> NetworkData {
    let mut nodes = Vec::new();
    let mut links = LinkSets::default();
    let mut seen: HashSet<String> = HashSet::new();

    for record in records {
        if !seen.contains(&record.id) {
            nodes.push(node_from_record(record));
            seen.insert(record.id.clone());
        }

        let preamble = record.preamble();
        let insights = record.insights();

        push_links(
            &mut links.references,
            &record.id,
            normalize_ids(insights.bip_references.as_ref()),
            &seen,
        );
        push_links(
            &mut links.dependencies,
            &record.id,
            normalize_ids(insights.dependencies.as_ref()),
            &seen,
        );
        push_links(
            &mut links.requires,
            &record.id,
            normalize_ids(preamble.requires.as_ref()),
            &seen,
        );
        push_links(
            &mut links.replaces,
            &record.id,
            normalize_ids(preamble.replaces.as_ref()),
            &seen,
        );
        push_links(
            &mut links.superseded_by,
            &record.id,
            normalize_ids(preamble.superseded_by.as_ref()),
            &seen,
        );
    }

    NetworkData { nodes, links }
}

fn node_from_record(record: &ProposalRecord) -> ProposalNode {
    let preamble = record.preamble();
    ProposalNode {
        id: record.id.clone(),
        group: preamble.layer.as_ref().and_then(value_to_string),
        compliance_score: preamble.compliance_score,
        created: preamble.created.clone(),
        author: author_entries(preamble),
        word_list: record.insights().word_list.clone(),
        status: preamble.status.as_ref().and_then(value_to_string),
        kind: preamble.kind.as_ref().and_then(value_to_string),
    }
}

fn push_links(out: &mut Vec<Link>, source: &str, targets: Vec<String>, seen: &HashSet<String>) {
    for target in targets {
        if seen.contains(&target) {
            out.push(Link {
                source: source.to_string(),
                target,
                value: 1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bipscope_ingest::resolve_records;
    use serde_json::json;

    fn records(raws: Vec<serde_json::Value>) -> Vec<ProposalRecord> {
        resolve_records(
            raws.into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect(),
        )
    }

    fn simple(id: &str, requires: serde_json::Value) -> serde_json::Value {
        json!({ "raw": { "preamble": { "bip": id, "requires": requires } } })
    }

    #[test]
    fn test_edges_require_already_seen_targets() {
        // A requires B, but B loads after A: the edge is dropped. B
        // requires A and A is already known: the edge materializes.
        let network = build_network(&records(vec![
            simple("1", json!("2")),
            simple("2", json!("1")),
        ]));

        assert_eq!(network.nodes.len(), 2);
        assert_eq!(
            network.links.requires,
            vec![Link {
                source: "2".into(),
                target: "1".into(),
                value: 1
            }]
        );
    }

    #[test]
    fn test_dangling_targets_are_dropped() {
        let network = build_network(&records(vec![simple("1", json!("99, 1"))]));

        // "99" never loads; the self-reference survives.
        assert_eq!(
            network.links.requires,
            vec![Link {
                source: "1".into(),
                target: "1".into(),
                value: 1
            }]
        );
    }

    #[test]
    fn test_duplicate_identifiers_first_wins_but_edges_accumulate() {
        let network = build_network(&records(vec![
            json!({ "raw": { "preamble": { "bip": "1", "title": "first" } } }),
            json!({ "raw": { "preamble": { "bip": "1", "title": "second", "replaces": "1" } } }),
        ]));

        assert_eq!(network.nodes.len(), 1);
        assert_eq!(network.links.replaces.len(), 1);
        assert_eq!(network.links.replaces[0].source, "1");
    }

    #[test]
    fn test_parallel_edges_are_not_deduplicated() {
        let network = build_network(&records(vec![
            simple("7", json!(null)),
            simple("8", json!("7, BIP 7")),
        ]));

        assert_eq!(network.links.requires.len(), 2);
    }

    #[test]
    fn test_all_five_edge_kinds() {
        let network = build_network(&records(vec![
            json!({ "raw": { "preamble": { "bip": "1" } } }),
            json!({
                "raw": { "preamble": {
                    "bip": "2",
                    "requires": "1",
                    "replaces": "BIP-1",
                    "superseded_by": "1"
                } },
                "insights": { "bip_references": ["1"], "dependencies": "1" }
            }),
        ]));

        assert_eq!(network.links.references.len(), 1);
        assert_eq!(network.links.dependencies.len(), 1);
        assert_eq!(network.links.requires.len(), 1);
        assert_eq!(network.links.replaces.len(), 1);
        assert_eq!(network.links.superseded_by.len(), 1);
        for link in &network.links.references {
            assert_eq!(link.value, 1);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = records(vec![
            json!({
                "raw": { "preamble": { "bip": "1", "layer": "Applications", "author": ["A <a@x>"] } },
                "insights": { "word_list": { "wallet": 3 } }
            }),
            simple("2", json!("1")),
        ]);

        assert_eq!(build_network(&input), build_network(&input));
    }

    #[test]
    fn test_serialized_contract_field_names() {
        let network = build_network(&records(vec![json!({
            "raw": { "preamble": { "bip": "1", "type": "Standards Track" } }
        })]));

        let value = serde_json::to_value(&network).unwrap();
        let links = value.get("links").unwrap().as_object().unwrap();
        for key in [
            "references",
            "dependencies",
            "requires",
            "replaces",
            "superseded_by",
        ] {
            assert!(links.contains_key(key), "missing link set {key}");
        }
        let node = &value.get("nodes").unwrap().as_array().unwrap()[0];
        assert_eq!(node.get("type").unwrap(), "Standards Track");
        assert!(node.get("kind").is_none());
    }
}
