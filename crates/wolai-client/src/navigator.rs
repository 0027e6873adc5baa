//! Page-tree navigation: bounded title search and breadcrumb walks.
//!
//! Wolai has no search endpoint and no "path to block" endpoint, so both are
//! built from `GET /blocks/{id}` and `GET /blocks/{id}/children`. The remote
//! tree is treated as an untrusted graph: every walk keeps a visited set.

use std::collections::{HashSet, VecDeque};

use crate::client::WolaiClient;
use crate::transport::ApiError;

/// A title match found by [`search_titles`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub id: String,
    pub depth: u32,
}

/// Breadth-first search for blocks whose title contains `query`
/// (case-insensitive), starting at `start_id` and going at most `max_depth`
/// levels down.
///
/// Only `page`, `heading_1` and `heading_2` children are descended into. A
/// non-success HTTP status for one node just means no data from that node;
/// any other error aborts the whole search. Hits come back in visitation order.
pub async fn search_titles(
    client: &WolaiClient,
    query: &str,
    start_id: &str,
    max_depth: u32,
) -> Result<Vec<SearchHit>, ApiError> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, u32)> = VecDeque::from([(start_id.to_string(), 0)]);

    while let Some((id, depth)) = queue.pop_front() {
        if depth > max_depth || !visited.insert(id.clone()) {
            continue;
        }

        match client.get_block(&id).await {
            Ok(block) => {
                let title = block.text();
                if title.to_lowercase().contains(&needle) {
                    hits.push(SearchHit { title, id: id.clone(), depth });
                }
            }
            Err(e) if e.is_status() => tracing::warn!(block_id = %id, "skipping node: {e}"),
            Err(e) => return Err(e),
        }

        if depth < max_depth {
            match client.get_children(&id).await {
                Ok(children) => {
                    queue.extend(
                        children
                            .into_iter()
                            .filter(|child| child.is_navigable() && !child.id.is_empty())
                            .map(|child| (child.id, depth + 1)),
                    );
                }
                Err(e) if e.is_status() => {
                    tracing::warn!(block_id = %id, "skipping children: {e}")
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::debug!(query, start_id, visited = visited.len(), hits = hits.len(), "search done");
    Ok(hits)
}

/// Titles from the topmost reachable ancestor down to `block_id`.
///
/// Walks `parent_id` links upward until there is no parent, a block names
/// itself as parent, a block repeats, or a fetch returns a non-success
/// status; whatever was collected by then is returned. Blocks with an empty
/// title contribute their ID instead.
pub async fn breadcrumbs(client: &WolaiClient, block_id: &str) -> Result<Vec<String>, ApiError> {
    let mut crumbs = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = block_id.to_string();

    while !current.is_empty() && visited.insert(current.clone()) {
        let block = match client.get_block(&current).await {
            Ok(block) => block,
            Err(e) if e.is_status() => {
                tracing::debug!(block_id = %current, "breadcrumb walk stopped: {e}");
                break;
            }
            Err(e) => return Err(e),
        };

        let title = block.text();
        crumbs.push(if title.is_empty() { current.clone() } else { title });

        match block.parent_id {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    crumbs.reverse();
    Ok(crumbs)
}
