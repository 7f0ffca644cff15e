//! Derived counts over the finished node set.
//!
//! All aggregators are stateless functions of `&NetworkData`; they can only
//! be invoked on a network the builder has already produced, so there is no
//! "aggregated before built" failure mode to guard against.

use crate::network::NetworkData;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

/// Dashboard noise terms excluded from the word cloud. Matched
/// case-insensitively and exactly.
const STOPWORDS: &[&str] = &[
    "code", "tt", "0", "1", "2", "3", "4", "32", "x", "key", "not", "if", "can", "pre", "must",
    "which", "s", "https", "com", "should", "may", "have", "new", "any", "no", "using", "use",
    "only", "used", "all", "we", "they", "when", "each", "time", "i", "but", "would", "than",
    "same", "m", "their", "more", "also", "such", "there", "then", "these", "bit", "bytes", "byte",
    "message", "comments", "data", "value", "type", "size", "set", "path", "ref", "org", "p", "n",
    "github", "mediawiki", "sub", "script", "public", "one", "number", "keys", "other", "first",
    "following", "implementation", "string", "case", "node", "private", "master", "does",
    "specification", "two", "change", "valid", "where", "after", "return", "e", "g", "without",
    "standard", "user", "order", "t", "index", "b", "example", "nodes", "non", "style", "format",
    "bits", "so", "license", "some", "field", "length", "messages", "defined", "being", "uri",
    "created", "k", "required", "possible", "both", "see", "let", "however", "list", "wiki",
    "into", "based", "them", "blob", "stack", "sup", "been", "name", "c", "do", "r", "5", "8",
    "up", "make", "since", "given", "per", "while",
];

static STOPWORD_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn stopwords() -> &'static HashSet<&'static str> {
    STOPWORD_SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerCount {
    pub layer: String,
    pub count: u64,
}

/// Proposals per calendar year of the creation date, ascending by year.
/// Nodes with an absent or unparseable date contribute nothing.
pub fn counts_per_year(network: &NetworkData) -> Vec<YearCount> {
    let mut per_year: BTreeMap<i32, u64> = BTreeMap::new();
    for node in &network.nodes {
        let Some(year) = node.created.as_deref().and_then(parse_year) else {
            continue;
        };
        *per_year.entry(year).or_insert(0) += 1;
    }

    per_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

fn parse_year(created: &str) -> Option<i32> {
    let created = created.trim();
    if let Ok(date) = NaiveDate::parse_from_str(created, "%Y-%m-%d") {
        return Some(date.year());
    }
    DateTime::parse_from_rfc3339(created)
        .ok()
        .map(|dt| dt.year())
}

/// Top 10 authors by authored proposal count. Each author entry is cut at
/// the first `<` (dropping the embedded contact token) and trimmed; ties
/// keep first-seen order.
pub fn top_authors(network: &NetworkData) -> Vec<AuthorCount> {
    let mut counter = OrderedCounter::new();
    for node in &network.nodes {
        for entry in &node.author {
            let name = entry.split('<').next().unwrap_or(entry).trim();
            counter.add(name.to_string(), 1);
        }
    }

    let mut out: Vec<AuthorCount> = counter
        .into_entries()
        .into_iter()
        .map(|(author, count)| AuthorCount { author, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out.truncate(10);
    out
}

/// Top 100 corpus terms by summed occurrence count, with stopwords and
/// all-digit tokens removed. Ties keep first-seen order.
pub fn word_cloud(network: &NetworkData) -> Vec<WordCount> {
    let mut counter = OrderedCounter::new();
    for node in &network.nodes {
        for (word, count) in &node.word_list {
            counter.add(word.clone(), *count);
        }
    }

    let mut out: Vec<WordCount> = counter
        .into_entries()
        .into_iter()
        .filter(|(word, _)| !is_noise_term(word))
        .map(|(word, count)| WordCount { word, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out.truncate(100);
    out
}

fn is_noise_term(word: &str) -> bool {
    word.bytes().all(|b| b.is_ascii_digit()) || stopwords().contains(word.to_lowercase().as_str())
}

/// Proposals per layer classification, descending by count. Nodes without a
/// layer are excluded.
pub fn counts_per_layer(network: &NetworkData) -> Vec<LayerCount> {
    let mut counter = OrderedCounter::new();
    for node in &network.nodes {
        if let Some(group) = &node.group {
            counter.add(group.clone(), 1);
        }
    }

    let mut out: Vec<LayerCount> = counter
        .into_entries()
        .into_iter()
        .map(|(layer, count)| LayerCount { layer, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Sorted distinct status values across the node set; a missing status
/// reports as "Unknown".
pub fn distinct_statuses(network: &NetworkData) -> Vec<String> {
    let statuses: BTreeSet<String> = network
        .nodes
        .iter()
        .map(|node| node.status.clone().unwrap_or_else(|| "Unknown".to_string()))
        .collect();
    statuses.into_iter().collect()
}

/// Counter that remembers first-insertion order, so a stable descending
/// sort breaks ties by first appearance.
struct OrderedCounter {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl OrderedCounter {
    fn new() -> Self {
        OrderedCounter {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn add(&mut self, key: String, amount: u64) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += amount,
            None => {
                self.counts.insert(key.clone(), amount);
                self.order.push(key);
            }
        }
    }

    fn into_entries(mut self) -> Vec<(String, u64)> {
        self.order
            .into_iter()
            .map(|key| {
                let count = self.counts.remove(&key).unwrap_or(0);
                (key, count)
            })
            .collect()
    }
}
