//! Opportunistic clustering of ungrouped tabs by normalized origin.

use sha2::{Digest, Sha256};
use tabweave_provider::TabProvider;
use tabweave_types::{GroupColor, Settings, TabId};
use tracing::debug;

use crate::{Result, Snapshot, build_snapshot, urls};

/// One origin's worth of ungrouped tabs, in encounter order.
#[derive(Debug, Clone)]
struct OriginBucket {
    origin: String,
    tab_ids: Vec<TabId>,
}

/// Deterministic origin-to-color mapping into the 7 non-grey colors.
///
/// Pure function of the origin string: no reliance on the iteration order
/// of any container, so color assignment is reproducible across runs.
pub fn color_for_origin(origin: &str) -> GroupColor {
    let digest = Sha256::digest(origin.as_bytes());
    let mut acc: u64 = 0;
    for byte in &digest[..8] {
        acc = (acc << 8) | u64::from(*byte);
    }
    GroupColor::NON_GREY[(acc % GroupColor::NON_GREY.len() as u64) as usize]
}

/// Buckets the snapshot's ungrouped, non-system tabs by origin, in
/// encounter order. Tabs with unparseable URLs are skipped silently.
fn bucket_ungrouped(snapshot: &Snapshot) -> Vec<OriginBucket> {
    let mut buckets: Vec<OriginBucket> = Vec::new();

    let Some(ungrouped) = snapshot.ungrouped() else {
        return buckets;
    };

    for tab in &ungrouped.tabs {
        if urls::is_system(&tab.url) {
            continue;
        }
        let Some(origin) = urls::origin(&tab.url) else {
            continue;
        };

        match buckets.iter_mut().find(|bucket| bucket.origin == origin) {
            Some(bucket) => bucket.tab_ids.push(tab.id),
            None => buckets.push(OriginBucket {
                origin,
                tab_ids: vec![tab.id],
            }),
        }
    }

    buckets
}

/// Explicit "group everything now" sweep: creates one real group per
/// origin with at least two ungrouped tabs. Returns the number of groups
/// created.
pub fn auto_group_all(provider: &dyn TabProvider) -> Result<usize> {
    let snapshot = build_snapshot(provider)?;
    let mut created = 0;

    for bucket in bucket_ungrouped(&snapshot) {
        if bucket.tab_ids.len() < 2 {
            continue;
        }
        let name = urls::origin_label(&bucket.origin);
        provider.create_group(&bucket.tab_ids, name, color_for_origin(&bucket.origin))?;
        debug!(origin = %bucket.origin, tabs = bucket.tab_ids.len(), "auto-grouped origin");
        created += 1;
    }

    Ok(created)
}

/// Threshold-triggered clustering, evaluated on tab-load-complete events.
///
/// Only the bucket matching the triggering URL's origin is considered
/// when one is given; without a trigger, the first bucket at threshold
/// wins. At most one group is created per invocation so the user never
/// sees several groups appear at once. Returns whether a group was
/// created.
pub fn check_auto_group(
    provider: &dyn TabProvider,
    settings: &Settings,
    trigger_url: Option<&str>,
) -> Result<bool> {
    if !settings.auto_group_by_domain {
        return Ok(false);
    }

    let snapshot = build_snapshot(provider)?;
    let buckets = bucket_ungrouped(&snapshot);

    let trigger_origin = trigger_url.and_then(urls::origin);
    let candidate = buckets.into_iter().find(|bucket| {
        let origin_matches = match &trigger_origin {
            Some(origin) => &bucket.origin == origin,
            None => true,
        };
        origin_matches && bucket.tab_ids.len() >= settings.auto_group_threshold
    });

    let Some(bucket) = candidate else {
        return Ok(false);
    };

    let name = urls::origin_label(&bucket.origin);
    provider.create_group(&bucket.tab_ids, name, color_for_origin(&bucket.origin))?;
    debug!(origin = %bucket.origin, "threshold reached, origin promoted to group");
    Ok(true)
}
