//! The static table mapping `/pools/default` paths to event paths.

use crate::core::domain::conversion::Conversion::{
    self, IdentityBytes, IdentityCount, IdentityMegabytes,
};

/// One extractable metric: where to read it, where to write it, and how to
/// convert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Keys into the status document, outermost first.
    pub source: &'static [&'static str],
    /// Keys into the metric event, outermost first.
    pub destination: &'static [&'static str],
    pub conversion: Conversion,
}

impl FieldSpec {
    pub const fn new(
        source: &'static [&'static str],
        destination: &'static [&'static str],
        conversion: Conversion,
    ) -> Self {
        Self {
            source,
            destination,
            conversion,
        }
    }

    pub fn source_path(&self) -> String {
        self.source.join(".")
    }

    pub fn destination_path(&self) -> String {
        self.destination.join(".")
    }
}

/// Every metric the cluster metricset reports.
pub static CLUSTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        &["storageTotals", "hdd", "free"],
        &["hdd", "free", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "hdd", "total"],
        &["hdd", "total", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "hdd", "used"],
        &["hdd", "used", "value", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "hdd", "usedByData"],
        &["hdd", "used", "by_data", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "hdd", "quotaTotal"],
        &["hdd", "quota", "total", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(&["maxBucketCount"], &["max_bucket_count"], IdentityCount),
    FieldSpec::new(
        &["indexMemoryQuota"],
        &["quota", "index_memory", "mb"],
        IdentityMegabytes,
    ),
    FieldSpec::new(&["memoryQuota"], &["quota", "memory", "mb"], IdentityMegabytes),
    FieldSpec::new(
        &["storageTotals", "ram", "quotaTotal"],
        &["ram", "quota", "total", "value", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "ram", "quotaTotalPerNode"],
        &["ram", "quota", "total", "per_node", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "ram", "quotaUsed"],
        &["ram", "quota", "used", "value", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "ram", "quotaUsedPerNode"],
        &["ram", "quota", "used", "per_node", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "ram", "total"],
        &["ram", "total", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "ram", "used"],
        &["ram", "used", "value", "bytes"],
        IdentityBytes,
    ),
    FieldSpec::new(
        &["storageTotals", "ram", "usedByData"],
        &["ram", "used", "by_data", "bytes"],
        IdentityBytes,
    ),
];
