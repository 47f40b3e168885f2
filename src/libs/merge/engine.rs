use super::{Accumulator, Criteria};
use crate::libs::gff::Feature;
use std::iter::Fuse;

/// Single-pass merge over records sorted so that mergeable records are
/// adjacent (see `Criteria::sort_order`).
///
/// Yields each record that joined no other record unchanged, and one merged
/// record, owning its components, for every span of two or more. The order is
/// not checked: unsorted input merges less than it could.
///
/// ```
/// # use featmerge::libs::gff::Feature;
/// # use featmerge::libs::merge::{Criteria, Merger};
/// let features = vec![
///     Feature::new("chr1", "gene", 1, 10).with_id("a"),
///     Feature::new("chr1", "gene", 8, 20).with_id("b"),
///     Feature::new("chr1", "gene", 40, 50).with_id("c"),
/// ];
/// let out: Vec<Feature> = Merger::new(features, Criteria::default()).collect();
/// assert_eq!(out.len(), 2);
/// assert_eq!(out[0].id.as_deref(), Some("merged_a_b"));
/// assert_eq!(out[0].components().len(), 2);
/// assert_eq!(out[1].id.as_deref(), Some("c"));
/// ```
pub struct Merger<I: Iterator<Item = Feature>> {
    input: Fuse<I>,
    criteria: Criteria,
    generic_type: bool,
    acc: Option<Accumulator>,
}

impl<I: Iterator<Item = Feature>> Merger<I> {
    pub fn new<T>(input: T, criteria: Criteria) -> Self
    where
        T: IntoIterator<Item = Feature, IntoIter = I>,
    {
        let generic_type = !criteria.matches_featuretype();
        Self {
            input: input.into_iter().fuse(),
            criteria,
            generic_type,
            acc: None,
        }
    }
}

impl<I: Iterator<Item = Feature>> Iterator for Merger<I> {
    type Item = Feature;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let feature = match self.input.next() {
                Some(feature) => feature,
                None => return self.acc.take().map(|acc| acc.finish(self.generic_type)),
            };

            match self.acc.take() {
                None => self.acc = Some(Accumulator::new(feature)),
                Some(mut acc) => {
                    if self.criteria.accepts(&acc, &feature) {
                        acc.absorb(feature);
                        self.acc = Some(acc);
                    } else {
                        self.acc = Some(Accumulator::new(feature));
                        return Some(acc.finish(self.generic_type));
                    }
                }
            }
        }
    }
}
