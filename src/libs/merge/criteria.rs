use super::Accumulator;
use crate::libs::error::MergeError;
use crate::libs::gff::Feature;
use crate::libs::store::SortOrder;
use std::fmt;

/// Uncovered bases tolerated between a span and a candidate joining it
pub const MAX_GAP: u64 = 1;

/// Signature of a user-supplied criterion: `(accumulator, candidate, components)`
pub type CriterionFn = fn(&Accumulator, &Feature, &[Feature]) -> bool;

/// One predicate deciding whether a candidate may join the current span.
///
/// Criteria are pure; they only read the accumulator and the candidate.
#[derive(Clone, Copy)]
pub enum Criterion {
    /// Same seqid and the candidate overlaps the current span, abuts it, or
    /// leaves at most `MAX_GAP` bases between them
    AnyOverlap,
    /// Same seqid, start and stop as the current span
    ExactCoordinates,
    /// Same strand
    Strand,
    /// Same featuretype
    FeatureType,
    /// A named external predicate
    Custom(&'static str, CriterionFn),
}

impl Criterion {
    pub fn accepts(&self, acc: &Accumulator, cur: &Feature, components: &[Feature]) -> bool {
        match self {
            Criterion::AnyOverlap => {
                cur.seqid == acc.seqid
                    && cur.start <= acc.stop.saturating_add(1 + MAX_GAP)
                    && cur.stop.saturating_add(1 + MAX_GAP) >= acc.start
            }
            Criterion::ExactCoordinates => {
                cur.seqid == acc.seqid && cur.start == acc.start && cur.stop == acc.stop
            }
            Criterion::Strand => cur.strand == acc.strand,
            Criterion::FeatureType => cur.featuretype == acc.featuretype,
            Criterion::Custom(_, f) => f(acc, cur, components),
        }
    }

    /// Whether this criterion constrains coordinates
    pub fn is_coordinate(&self) -> bool {
        matches!(
            self,
            Criterion::AnyOverlap | Criterion::ExactCoordinates | Criterion::Custom(..)
        )
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::AnyOverlap => write!(f, "AnyOverlap"),
            Criterion::ExactCoordinates => write!(f, "ExactCoordinates"),
            Criterion::Strand => write!(f, "Strand"),
            Criterion::FeatureType => write!(f, "FeatureType"),
            Criterion::Custom(name, _) => write!(f, "Custom({})", name),
        }
    }
}

/// An ordered chain of criteria; a candidate is accepted when every member
/// accepts it.
#[derive(Debug, Clone)]
pub struct Criteria(Vec<Criterion>);

impl Default for Criteria {
    fn default() -> Self {
        Self::from_flags(false, false, false)
    }
}

impl Criteria {
    pub fn new(list: Vec<Criterion>) -> Self {
        Self(list)
    }

    /// The default chain `overlap, strand, featuretype`, with members dropped
    /// by the ignore flags. `exact_only` swaps overlap for exact coordinates.
    ///
    /// ```
    /// # use featmerge::libs::merge::Criteria;
    /// let criteria = Criteria::from_flags(true, false, true);
    /// assert_eq!(format!("{:?}", criteria.list()), "[ExactCoordinates, FeatureType]");
    /// ```
    pub fn from_flags(ignore_strand: bool, ignore_featuretype: bool, exact_only: bool) -> Self {
        let mut list = vec![if exact_only {
            Criterion::ExactCoordinates
        } else {
            Criterion::AnyOverlap
        }];
        if !ignore_strand {
            list.push(Criterion::Strand);
        }
        if !ignore_featuretype {
            list.push(Criterion::FeatureType);
        }
        Self(list)
    }

    pub fn list(&self) -> &[Criterion] {
        &self.0
    }

    pub fn accepts(&self, acc: &Accumulator, cur: &Feature) -> bool {
        let components = acc.components();
        self.0.iter().all(|c| c.accepts(acc, cur, components))
    }

    pub fn matches_strand(&self) -> bool {
        self.0.iter().any(|c| matches!(c, Criterion::Strand))
    }

    pub fn matches_featuretype(&self) -> bool {
        self.0.iter().any(|c| matches!(c, Criterion::FeatureType))
    }

    /// Sort order that places every mergeable record next to each other
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::new(self.matches_featuretype(), self.matches_strand())
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.0.iter().any(|c| c.is_coordinate()) {
            Ok(())
        } else {
            Err(MergeError::NoCoordinateCriterion)
        }
    }
}
