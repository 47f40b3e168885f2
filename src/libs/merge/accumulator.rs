use super::combine;
use crate::libs::gff::{Feature, Frame, Strand};

/// The span being extended while scanning sorted records.
///
/// Owned by one merge pass; `finish` consumes it.
#[derive(Debug, Clone)]
pub struct Accumulator {
    pub seqid: String,
    pub start: u64,
    pub stop: u64,
    pub strand: Strand,
    pub frame: Frame,
    pub featuretype: String,
    components: Vec<Feature>,
}

impl Accumulator {
    pub fn new(feature: Feature) -> Self {
        Self {
            seqid: feature.seqid.clone(),
            start: feature.start,
            stop: feature.stop,
            strand: feature.strand,
            frame: feature.frame,
            featuretype: feature.featuretype.clone(),
            components: vec![feature],
        }
    }

    pub fn components(&self) -> &[Feature] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Adds an accepted record to the span.
    ///
    /// ```
    /// # use featmerge::libs::gff::{Feature, Strand};
    /// # use featmerge::libs::merge::Accumulator;
    /// let mut acc = Accumulator::new(Feature::new("chr1", "gene", 1, 10).with_strand(Strand::Forward));
    /// acc.absorb(Feature::new("chr1", "gene", 5, 30).with_strand(Strand::Reverse));
    /// assert_eq!((acc.start, acc.stop), (1, 30));
    /// assert_eq!(acc.strand, Strand::Unstranded);
    /// ```
    pub fn absorb(&mut self, feature: Feature) {
        // sorted input never lowers start
        self.start = self.start.min(feature.start);
        self.stop = self.stop.max(feature.stop);
        if feature.strand != self.strand {
            self.strand = Strand::Unstranded;
        }
        if feature.frame != self.frame {
            self.frame = Frame::None;
        }
        self.components.push(feature);
    }

    /// Turns the span into an output record. A span of one record gives that
    /// record back untouched.
    pub fn finish(self, generic_type: bool) -> Feature {
        if self.components.len() == 1 {
            let mut components = self.components;
            return components.remove(0);
        }

        let Accumulator {
            seqid,
            start,
            stop,
            strand,
            frame,
            featuretype,
            components,
        } = self;
        let featuretype = if generic_type {
            combine::GENERIC_FEATURETYPE.to_string()
        } else {
            featuretype
        };

        let merged = Feature {
            seqid,
            source: String::new(),
            featuretype,
            start,
            stop,
            score: ".".to_string(),
            strand,
            frame,
            ..Default::default()
        };
        combine::build(merged, components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_component_is_returned_unchanged() {
        let f = Feature::new("chr1", "gene", 1, 10)
            .with_id("g1")
            .with_attribute("Note", "x");
        let out = Accumulator::new(f.clone()).finish(false);
        assert_eq!(out, f);
        assert!(!out.is_merged());
    }

    #[test]
    fn test_absorb_contained_keeps_stop() {
        let mut acc = Accumulator::new(Feature::new("chr1", "gene", 1, 100));
        acc.absorb(Feature::new("chr1", "gene", 10, 20));
        assert_eq!((acc.start, acc.stop), (1, 100));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_frame_conflict() {
        let mut a = Feature::new("chr1", "CDS", 1, 10);
        a.frame = Frame::Zero;
        let mut b = Feature::new("chr1", "CDS", 5, 20);
        b.frame = Frame::Zero;
        let mut c = Feature::new("chr1", "CDS", 15, 30);
        c.frame = Frame::Two;

        let mut acc = Accumulator::new(a);
        acc.absorb(b);
        assert_eq!(acc.frame, Frame::Zero);
        acc.absorb(c);
        assert_eq!(acc.frame, Frame::None);
    }

    #[test]
    fn test_finish_generic_type() {
        let mut acc = Accumulator::new(Feature::new("chr1", "gene", 1, 10).with_id("a"));
        acc.absorb(Feature::new("chr1", "pseudogene", 5, 20).with_id("b"));
        let merged = acc.finish(true);
        assert_eq!(merged.featuretype, "sequence_feature");
        assert_eq!((merged.start, merged.stop), (1, 20));
        assert_eq!(merged.components().len(), 2);
    }
}
