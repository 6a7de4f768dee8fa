//! Detection and reduction of duplicate open documents.

use serde::{Deserialize, Serialize};
use tabweave_provider::TabProvider;
use tabweave_types::{Tab, TabId};
use tracing::debug;

use crate::{Result, Snapshot, build_snapshot, urls};

/// All tabs sharing one normalized URL, in encounter order. Only buckets
/// with at least two members are ever reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateBucket {
    pub url: String,
    pub tabs: Vec<Tab>,
}

/// Buckets every tab in the snapshot by normalized URL and retains the
/// buckets with two or more members. Bucket order and tab order within a
/// bucket both follow encounter order; unparseable URLs are skipped.
pub fn find_duplicates(snapshot: &Snapshot, ignore_query_params: bool) -> Vec<DuplicateBucket> {
    let mut buckets: Vec<DuplicateBucket> = Vec::new();

    for tab in snapshot.all_tabs() {
        let Some(normalized) = urls::normalize_for_dedup(&tab.url, ignore_query_params) else {
            continue;
        };

        match buckets.iter_mut().find(|bucket| bucket.url == normalized) {
            Some(bucket) => bucket.tabs.push(tab.clone()),
            None => buckets.push(DuplicateBucket {
                url: normalized,
                tabs: vec![tab.clone()],
            }),
        }
    }

    buckets.retain(|bucket| bucket.tabs.len() >= 2);
    buckets
}

/// Closes every tab of one bucket except the first. No-op when the
/// normalized URL has no bucket or the bucket is a singleton. Returns the
/// number of tabs closed.
pub fn keep_first(
    provider: &dyn TabProvider,
    ignore_query_params: bool,
    normalized_url: &str,
) -> Result<usize> {
    let snapshot = build_snapshot(provider)?;
    let buckets = find_duplicates(&snapshot, ignore_query_params);

    let Some(bucket) = buckets.into_iter().find(|b| b.url == normalized_url) else {
        return Ok(0);
    };

    let losers: Vec<TabId> = bucket.tabs[1..].iter().map(|tab| tab.id).collect();
    provider.close_tabs(&losers)?;
    debug!(url = normalized_url, closed = losers.len(), "duplicates reduced");
    Ok(losers.len())
}

/// Closes all non-first tabs across every duplicate bucket and reports
/// the aggregate count closed. Not transactional: a provider failure
/// partway through leaves earlier buckets already reduced.
pub fn close_all(provider: &dyn TabProvider, ignore_query_params: bool) -> Result<usize> {
    let snapshot = build_snapshot(provider)?;
    let mut closed = 0;

    for bucket in find_duplicates(&snapshot, ignore_query_params) {
        let losers: Vec<TabId> = bucket.tabs[1..].iter().map(|tab| tab.id).collect();
        provider.close_tabs(&losers)?;
        closed += losers.len();
    }

    Ok(closed)
}
