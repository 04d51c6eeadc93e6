//! Cluster-wide memory metrics.

use crate::management::{JmxClient, MBeanConnector};
use failure::{Fallible, ResultExt};
use std::collections::BTreeMap;

/// Domain of the JVM platform beans.
pub static MEMORY_POOL_DOMAIN: &str = "java.lang";

/// Peak used bytes of a memory pool.
pub static PEAK_USAGE_USED: &str = "PeakUsage.used";

/// Heap pools of the G1 collector.
pub static G1_HEAP_POOLS: [&str; 3] = [
    ".*G1 Eden Space,type=MemoryPool",
    ".*G1 Old Gen,type=MemoryPool",
    ".*G1 Survivor Space,type=MemoryPool",
];

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert bytes to GiB, rounded half-up to two decimals.
pub fn bytes_to_gib(bytes: u64) -> f64 {
    let gib = bytes as f64 / BYTES_PER_GIB;
    (gib * 100.0).round() / 100.0
}

/// Run `read` against every node, keyed by node name.
///
/// Nodes are read independently; the first failure aborts the whole call
/// and no partial result is returned.
pub fn aggregate<I, C, T, F>(connectors: I, read: F) -> Fallible<BTreeMap<String, T>>
where
    I: IntoIterator<Item = C>,
    C: MBeanConnector,
    F: Fn(&JmxClient<C>) -> Fallible<T>,
{
    connectors
        .into_iter()
        .map(|conn| -> Fallible<(String, T)> {
            let client = JmxClient::new(conn);
            let value = read(&client)?;
            Ok((client.node().to_string(), value))
        })
        .collect()
}

/// Sum of peak used bytes across the G1 heap pools of one node.
pub fn node_peak_heap_bytes<C: MBeanConnector>(client: &JmxClient<C>) -> Fallible<u64> {
    let mut total: u64 = 0;
    for pattern in G1_HEAP_POOLS.iter() {
        let bean = client.find_mbean(pattern, MEMORY_POOL_DOMAIN)?;
        let raw = client.mbean_attribute(&bean, PEAK_USAGE_USED)?.first()?;
        let used = raw.parse::<u64>().context(format!(
            "node '{}': non-numeric {} '{}' for '{}'",
            client.node(),
            PEAK_USAGE_USED,
            raw,
            bean.name()
        ))?;
        total = total
            .checked_add(used)
            .ok_or_else(|| format_err!("node '{}': peak heap usage overflow", client.node()))?;
    }
    debug!("node '{}': peak heap usage {} bytes", client.node(), total);
    Ok(total)
}

/// Peak heap usage of one node, in GiB.
pub fn node_peak_heap_usage<C: MBeanConnector>(client: &JmxClient<C>) -> Fallible<f64> {
    node_peak_heap_bytes(client).map(bytes_to_gib)
}

/// Peak heap usage per node, in GiB.
pub fn peak_heap_usage<I, C>(connectors: I) -> Fallible<BTreeMap<String, f64>>
where
    I: IntoIterator<Item = C>,
    C: MBeanConnector,
{
    aggregate(connectors, node_peak_heap_usage)
}
