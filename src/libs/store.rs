use crate::libs::error::MergeError;
use crate::libs::gff::{Dialect, Feature, GffReader};
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

/// What to do when a record's ID is already in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateStrategy {
    /// Fold the attributes of records that agree on every other column
    #[default]
    Merge,
    /// Rename later records to `ID_1`, `ID_2`, ...
    CreateUnique,
    /// Reject any duplicate
    Error,
}

impl FromStr for DuplicateStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(DuplicateStrategy::Merge),
            "create_unique" => Ok(DuplicateStrategy::CreateUnique),
            "error" => Ok(DuplicateStrategy::Error),
            _ => Err(anyhow::anyhow!("Unknown merge strategy: {}", s)),
        }
    }
}

/// Sort key `seqid, [featuretype], [strand], start, stop`.
///
/// Ties keep load order, so a stable sort is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub by_featuretype: bool,
    pub by_strand: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            by_featuretype: true,
            by_strand: true,
        }
    }
}

impl SortOrder {
    pub fn new(by_featuretype: bool, by_strand: bool) -> Self {
        Self {
            by_featuretype,
            by_strand,
        }
    }

    pub fn compare(&self, a: &Feature, b: &Feature) -> Ordering {
        let mut ord = a.seqid.cmp(&b.seqid);
        if self.by_featuretype {
            ord = ord.then_with(|| a.featuretype.cmp(&b.featuretype));
        }
        if self.by_strand {
            ord = ord.then_with(|| a.strand.cmp(&b.strand));
        }
        ord.then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.stop.cmp(&b.stop))
    }

    pub fn sort(&self, features: &mut [Feature]) {
        features.sort_by(|a, b| self.compare(a, b));
    }
}

/// Source of records for the merge passes
pub trait FeatureStore {
    /// Distinct featuretypes present, sorted
    fn featuretypes(&self) -> Vec<String>;

    /// Copies of the records whose type is in `types` (all records for
    /// `None`), sorted by `order`
    fn features(&self, types: Option<&IndexSet<String>>, order: SortOrder) -> Vec<Feature>;
}

/// Records of one or more annotation files kept in load order
#[derive(Debug, Default)]
pub struct MemoryStore {
    features: Vec<Feature>,
    index_of: HashMap<String, usize>,
    strategy: DuplicateStrategy,
    dialect: Option<Dialect>,
}

impl MemoryStore {
    pub fn new(strategy: DuplicateStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Dialect of the first loaded file that had attributes
    pub fn dialect(&self) -> Dialect {
        self.dialect.unwrap_or_default()
    }

    /// Reads every record of `reader`, returning how many were read
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<usize, MergeError> {
        let mut gff_in = GffReader::new(reader);
        let mut count = 0;
        for result in gff_in.by_ref() {
            self.insert(result?)?;
            count += 1;
        }
        if self.dialect.is_none() {
            self.dialect = gff_in.dialect();
        }
        Ok(count)
    }

    pub fn insert(&mut self, mut feature: Feature) -> Result<(), MergeError> {
        let id = match feature.id.clone() {
            Some(id) => id,
            None => {
                self.features.push(feature);
                return Ok(());
            }
        };

        let idx = match self.index_of.get(&id) {
            Some(&idx) => idx,
            None => {
                self.index_of.insert(id, self.features.len());
                self.features.push(feature);
                return Ok(());
            }
        };

        match self.strategy {
            DuplicateStrategy::Error => Err(MergeError::DuplicateId { id }),
            DuplicateStrategy::Merge => {
                let existing = &mut self.features[idx];
                if !same_location(existing, &feature) {
                    return Err(MergeError::DuplicateId { id });
                }
                for (key, values) in feature.attributes.iter() {
                    existing.attributes.push_unique(key, values);
                }
                Ok(())
            }
            DuplicateStrategy::CreateUnique => {
                let unique = (1..)
                    .map(|n| format!("{}_{}", id, n))
                    .find(|candidate| !self.index_of.contains_key(candidate))
                    .unwrap_or_else(|| id.clone());
                log::debug!("Renamed duplicate ID {} to {}", id, unique);
                feature.attributes.insert("ID", vec![unique.clone()]);
                feature.id = Some(unique.clone());
                self.index_of.insert(unique, self.features.len());
                self.features.push(feature);
                Ok(())
            }
        }
    }

    /// Number of records per featuretype, ordered by type
    pub fn count_by_type(&self) -> IndexMap<String, usize> {
        let mut count_of: IndexMap<String, usize> = IndexMap::new();
        for feature in &self.features {
            *count_of.entry(feature.featuretype.clone()).or_default() += 1;
        }
        count_of.sort_keys();
        count_of
    }
}

fn same_location(a: &Feature, b: &Feature) -> bool {
    a.seqid == b.seqid
        && a.source == b.source
        && a.featuretype == b.featuretype
        && a.start == b.start
        && a.stop == b.stop
        && a.score == b.score
        && a.strand == b.strand
        && a.frame == b.frame
}

impl FeatureStore for MemoryStore {
    fn featuretypes(&self) -> Vec<String> {
        self.count_by_type().into_keys().collect()
    }

    fn features(&self, types: Option<&IndexSet<String>>, order: SortOrder) -> Vec<Feature> {
        let mut selected: Vec<Feature> = self
            .features
            .iter()
            .filter(|f| types.map_or(true, |set| set.contains(&f.featuretype)))
            .cloned()
            .collect();
        order.sort(&mut selected);
        selected
    }
}
