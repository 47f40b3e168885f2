use super::{Criteria, Merger};
use crate::libs::error::MergeError;
use crate::libs::gff::Feature;
use crate::libs::store::{FeatureStore, SortOrder};
use indexmap::IndexSet;
use itertools::Itertools;
use std::collections::HashSet;

/// Featuretypes merged together in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeGroup {
    /// Every type not claimed by an earlier group
    All,
    /// Claims nothing
    None,
    Types(IndexSet<String>),
}

impl MergeGroup {
    /// Parses a comma-separated list. `ALL` and `NONE` are sentinels and must
    /// stand alone.
    ///
    /// ```
    /// # use featmerge::libs::merge::MergeGroup;
    /// assert_eq!(MergeGroup::parse("ALL").unwrap(), MergeGroup::All);
    /// assert_eq!(MergeGroup::parse("NONE").unwrap(), MergeGroup::None);
    /// match MergeGroup::parse("gene, mRNA,,gene").unwrap() {
    ///     MergeGroup::Types(types) => assert_eq!(types.len(), 2),
    ///     _ => unreachable!(),
    /// }
    /// assert!(MergeGroup::parse("gene,ALL").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, MergeError> {
        let tokens: IndexSet<String> = s
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect();

        let has_all = tokens.contains("ALL");
        let has_none = tokens.contains("NONE");
        if (has_all || has_none) && tokens.len() > 1 {
            return Err(MergeError::MixedGroup {
                group: s.to_string(),
            });
        }

        if has_all {
            Ok(MergeGroup::All)
        } else if has_none || tokens.is_empty() {
            Ok(MergeGroup::None)
        } else {
            Ok(MergeGroup::Types(tokens))
        }
    }
}

/// Rejects a type listed in two groups, a type group following `ALL`, or
/// `ALL` given twice
pub fn validate_groups(groups: &[MergeGroup]) -> Result<(), MergeError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut seen_all = false;
    for group in groups {
        match group {
            MergeGroup::All => {
                if seen_all {
                    return Err(MergeError::DuplicateAll);
                }
                seen_all = true;
            }
            MergeGroup::None => {}
            MergeGroup::Types(types) => {
                for featuretype in types {
                    // ALL has already claimed every type
                    if seen_all || !seen.insert(featuretype.as_str()) {
                        return Err(MergeError::DuplicateType {
                            featuretype: featuretype.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

enum State {
    Pending,
    Running(Merger<std::vec::IntoIter<Feature>>),
    Remainder(std::vec::IntoIter<Feature>),
    Done,
}

/// Runs one merge pass per group, in order, then passes the records of
/// unclaimed featuretypes through untouched.
///
/// Records are copied out of the store; the store itself is never modified.
pub struct MergeAll<'a, S: FeatureStore + ?Sized> {
    store: &'a S,
    criteria: Criteria,
    order: SortOrder,
    groups: std::vec::IntoIter<MergeGroup>,
    remaining: IndexSet<String>,
    state: State,
    pass: usize,
}

impl<'a, S: FeatureStore + ?Sized> MergeAll<'a, S> {
    /// Checks the configuration before any record is read
    pub fn new(
        store: &'a S,
        groups: Vec<MergeGroup>,
        criteria: Criteria,
    ) -> Result<Self, MergeError> {
        criteria.validate()?;
        validate_groups(&groups)?;

        let remaining: IndexSet<String> = store.featuretypes().into_iter().collect();
        for group in &groups {
            if let MergeGroup::Types(types) = group {
                for featuretype in types.iter().filter(|t| !remaining.contains(*t)) {
                    log::warn!("Featuretype {} not found in the input", featuretype);
                }
            }
        }

        let order = criteria.sort_order();
        Ok(Self {
            store,
            criteria,
            order,
            groups: groups.into_iter(),
            remaining,
            state: State::Pending,
            pass: 0,
        })
    }

    /// Featuretypes not claimed by any group processed so far
    pub fn remaining(&self) -> &IndexSet<String> {
        &self.remaining
    }

    fn claim(&mut self, group: MergeGroup) -> IndexSet<String> {
        match group {
            MergeGroup::All => std::mem::take(&mut self.remaining),
            MergeGroup::None => IndexSet::new(),
            MergeGroup::Types(types) => {
                let claimed: IndexSet<String> = types
                    .into_iter()
                    .filter(|t| self.remaining.contains(t))
                    .collect();
                self.remaining.retain(|t| !claimed.contains(t));
                claimed
            }
        }
    }

    /// Moves to the next group pass, the remainder, or the end
    fn advance(&mut self) {
        if matches!(self.state, State::Remainder(_) | State::Done) {
            self.state = State::Done;
            return;
        }

        while let Some(group) = self.groups.next() {
            let types = self.claim(group);
            self.pass += 1;
            if types.is_empty() {
                log::info!("Merge pass {}: no featuretypes", self.pass);
                continue;
            }

            let features = self.store.features(Some(&types), self.order);
            log::info!(
                "Merge pass {}: {} records of {}",
                self.pass,
                features.len(),
                types.iter().join(",")
            );
            self.state = State::Running(Merger::new(features, self.criteria.clone()));
            return;
        }

        let features = if self.remaining.is_empty() {
            vec![]
        } else {
            self.store.features(Some(&self.remaining), self.order)
        };
        if !features.is_empty() {
            log::info!("Passing through {} unmerged records", features.len());
        }
        self.state = State::Remainder(features.into_iter());
    }
}

impl<S: FeatureStore + ?Sized> Iterator for MergeAll<'_, S> {
    type Item = Feature;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = match &mut self.state {
                State::Pending => None,
                State::Running(merger) => merger.next(),
                State::Remainder(features) => features.next(),
                State::Done => return None,
            };
            if next.is_some() {
                return next;
            }
            self.advance();
        }
    }
}
