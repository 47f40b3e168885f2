//! Merging of overlapping features.
//!
//! `Merger` does one sorted, single-pass merge; `MergeAll` drives one pass per
//! featuretype group over a `FeatureStore`.

pub mod accumulator;
pub mod combine;
pub mod criteria;
pub mod engine;
pub mod group;

pub use accumulator::Accumulator;
pub use criteria::{Criteria, Criterion, CriterionFn};
pub use engine::Merger;
pub use group::{validate_groups, MergeAll, MergeGroup};

use crate::libs::gff::Feature;

/// Flags of a merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub ignore_strand: bool,
    pub ignore_featuretype: bool,
    pub exact_only: bool,
    pub exclude_components: bool,
}

impl MergeOptions {
    pub fn criteria(&self) -> Criteria {
        Criteria::from_flags(self.ignore_strand, self.ignore_featuretype, self.exact_only)
    }
}

/// Records to print for one merge output: the components in merge order
/// (unless excluded), then the merged record. Unmerged records print alone.
///
/// ```
/// # use featmerge::libs::gff::Feature;
/// # use featmerge::libs::merge::{flatten, Criteria, Merger};
/// let features = vec![
///     Feature::new("chr1", "gene", 1, 10).with_id("a"),
///     Feature::new("chr1", "gene", 5, 20).with_id("b"),
/// ];
/// let merged = Merger::new(features, Criteria::default()).next().unwrap();
///
/// let ids: Vec<_> = flatten(&merged, false).iter().map(|f| f.id.clone().unwrap()).collect();
/// assert_eq!(ids, vec!["a", "b", "merged_a_b"]);
/// assert_eq!(flatten(&merged, true).len(), 1);
/// ```
pub fn flatten(feature: &Feature, exclude_components: bool) -> Vec<&Feature> {
    if !feature.is_merged() {
        return vec![feature];
    }

    let mut records = vec![];
    if !exclude_components {
        records.extend(feature.components());
    }
    records.push(feature);
    records
}
