pub mod attributes;
pub mod reader;

pub use attributes::Attributes;
pub use reader::GffReader;

use crate::libs::error::MergeError;
use std::fmt;
use std::str::FromStr;

/// Header line written before GFF3 output
pub const GFF3_HEADER: &str = "##gff-version 3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unstranded,
}

impl FromStr for Strand {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." | "?" => Ok(Strand::Unstranded),
            _ => Err(MergeError::parse(format!("Invalid strand: {}", s))),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => ".",
        };
        write!(f, "{}", c)
    }
}

/// Reading frame (phase) of a CDS record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frame {
    Zero,
    One,
    Two,
    #[default]
    None,
}

impl FromStr for Frame {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Frame::Zero),
            "1" => Ok(Frame::One),
            "2" => Ok(Frame::Two),
            "." => Ok(Frame::None),
            _ => Err(MergeError::parse(format!("Invalid frame: {}", s))),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Frame::Zero => "0",
            Frame::One => "1",
            Frame::Two => "2",
            Frame::None => ".",
        };
        write!(f, "{}", c)
    }
}

/// Attribute column syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `key=value1,value2;key2=value`
    #[default]
    Gff3,
    /// `key "value"; key2 "value";`
    Gtf,
}

impl Dialect {
    /// Guesses the dialect from an attribute column. `None` for `.` or an
    /// empty column.
    ///
    /// ```
    /// # use featmerge::libs::gff::Dialect;
    /// assert_eq!(Dialect::detect("ID=g1;Name=x"), Some(Dialect::Gff3));
    /// assert_eq!(Dialect::detect(r#"gene_id "g1";"#), Some(Dialect::Gtf));
    /// assert_eq!(Dialect::detect("."), None);
    /// ```
    pub fn detect(field: &str) -> Option<Dialect> {
        let first = field.trim().split(';').next().unwrap_or("").trim();
        if first.is_empty() || first == "." {
            None
        } else if first.contains('=') {
            Some(Dialect::Gff3)
        } else if first.contains(char::is_whitespace) {
            Some(Dialect::Gtf)
        } else {
            Some(Dialect::Gff3)
        }
    }
}

/// One annotation record.
///
/// `start` and `stop` are 1-based and inclusive. `children` is filled only on
/// merged records, which own their components.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feature {
    pub seqid: String,
    pub source: String,
    pub featuretype: String,
    pub start: u64,
    pub stop: u64,
    pub score: String,
    pub strand: Strand,
    pub frame: Frame,
    pub attributes: Attributes,
    pub id: Option<String>,
    pub children: Vec<Feature>,
}

impl Feature {
    /// ```
    /// # use featmerge::libs::gff::{Feature, Strand};
    /// let f = Feature::new("chr1", "gene", 1, 10).with_strand(Strand::Reverse);
    /// assert_eq!(f.len(), 10);
    /// assert_eq!(f.to_string(), "chr1\t.\tgene\t1\t10\t.\t-\t.\t.");
    /// ```
    pub fn new(seqid: &str, featuretype: &str, start: u64, stop: u64) -> Self {
        Self {
            seqid: seqid.to_string(),
            source: ".".to_string(),
            featuretype: featuretype.to_string(),
            start,
            stop,
            score: ".".to_string(),
            ..Default::default()
        }
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    /// Sets the `ID` attribute and `id` together
    pub fn with_id(mut self, id: &str) -> Self {
        self.attributes.insert("ID", vec![id.to_string()]);
        self.id = Some(id.to_string());
        self
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push(key, value);
        self
    }

    /// Bases covered, saturating at `u64::MAX`
    pub fn len(&self) -> u64 {
        if self.stop < self.start {
            0
        } else {
            (self.stop - self.start).saturating_add(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stop < self.start
    }

    /// Components of a merged record; empty for records that were not merged
    pub fn components(&self) -> &[Feature] {
        &self.children
    }

    pub fn is_merged(&self) -> bool {
        !self.children.is_empty()
    }

    /// Parses one tab-separated record, returning the dialect its attribute
    /// column was written in.
    pub fn parse(line: &str) -> Result<(Feature, Option<Dialect>), MergeError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() < 8 {
            return Err(MergeError::parse(format!(
                "Expected 9 tab-separated fields, found {}",
                fields.len()
            )));
        }

        let start = fields[3]
            .parse::<u64>()
            .map_err(|_| MergeError::parse(format!("Invalid start: {}", fields[3])))?;
        let stop = fields[4]
            .parse::<u64>()
            .map_err(|_| MergeError::parse(format!("Invalid end: {}", fields[4])))?;
        if start == 0 || start > stop {
            return Err(MergeError::parse(format!(
                "Invalid coordinates: {}-{}",
                start, stop
            )));
        }

        let column = fields.get(8).copied().unwrap_or(".");
        let dialect = Dialect::detect(column);
        let attributes = match dialect {
            Some(Dialect::Gtf) => Attributes::parse_gtf(column),
            _ => Attributes::parse_gff3(column),
        };
        let id = attributes.first("ID").map(|s| s.to_string());

        let feature = Feature {
            seqid: fields[0].to_string(),
            source: fields[1].to_string(),
            featuretype: fields[2].to_string(),
            start,
            stop,
            score: fields[5].to_string(),
            strand: fields[6].parse()?,
            frame: fields[7].parse()?,
            attributes,
            id,
            children: vec![],
        };

        Ok((feature, dialect))
    }

    /// Serializes the record without a trailing newline
    pub fn to_line(&self, dialect: Dialect) -> String {
        let attributes = match dialect {
            Dialect::Gff3 => self.attributes.to_gff3(),
            Dialect::Gtf => self.attributes.to_gtf(),
        };
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqid,
            self.source,
            self.featuretype,
            self.start,
            self.stop,
            self.score,
            self.strand,
            self.frame,
            attributes,
        )
    }
}

impl FromStr for Feature {
    type Err = MergeError;

    /// ```
    /// # use featmerge::libs::gff::{Feature, Frame, Strand};
    /// let f: Feature = "ctg1\tprodigal\tCDS\t5\t50\t3.2\t-\t0\tID=cds1;Note=a,b"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(f.id.as_deref(), Some("cds1"));
    /// assert_eq!(f.strand, Strand::Reverse);
    /// assert_eq!(f.frame, Frame::Zero);
    /// assert_eq!(f.attributes.get("Note").unwrap(), &["a", "b"]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::parse(s).map(|(feature, _)| feature)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line(Dialect::Gff3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gtf_record() {
        let line = "chr2\tensembl\texon\t100\t200\t.\t+\t.\tgene_id \"g1\"; exon_number \"1\";";
        let (f, dialect) = Feature::parse(line).unwrap();
        assert_eq!(dialect, Some(Dialect::Gtf));
        assert_eq!(f.id, None);
        assert_eq!(f.attributes.first("gene_id"), Some("g1"));
        assert_eq!(f.to_line(Dialect::Gtf), line);
    }

    #[test]
    fn test_parse_round_trip_gff3() {
        let line = "chr1\tsrc\tgene\t1\t1000\t.\t+\t.\tID=g1;Name=abc";
        let f: Feature = line.parse().unwrap();
        assert_eq!(f.to_string(), line);
    }

    #[test]
    fn test_parse_eight_columns() {
        let f: Feature = "chr1\tsrc\tregion\t1\t10\t.\t.\t.".parse().unwrap();
        assert!(f.attributes.is_empty());
        assert_eq!(f.to_string(), "chr1\tsrc\tregion\t1\t10\t.\t.\t.\t.");
    }

    #[test]
    fn test_parse_errors() {
        assert!("chr1\tsrc\tgene\t1".parse::<Feature>().is_err());
        assert!("chr1\tsrc\tgene\tx\t10\t.\t+\t.\t.".parse::<Feature>().is_err());
        assert!("chr1\tsrc\tgene\t20\t10\t.\t+\t.\t.".parse::<Feature>().is_err());
        assert!("chr1\tsrc\tgene\t1\t10\t.\t*\t.\t.".parse::<Feature>().is_err());
        assert!("chr1\tsrc\tgene\t1\t10\t.\t+\t3\t.".parse::<Feature>().is_err());
    }

    #[test]
    fn test_len_at_coordinate_limit() {
        let f: Feature = "chr1\tsrc\tgene\t1\t18446744073709551615\t.\t+\t.\t."
            .parse()
            .unwrap();
        assert_eq!(f.len(), u64::MAX);
        assert_eq!(Feature::new("chr1", "gene", 1, u64::MAX).len(), u64::MAX);
        assert_eq!(Feature::new("chr1", "gene", 5, 5).len(), 1);
    }

    #[test]
    fn test_unknown_strand_reads_as_unstranded() {
        let f: Feature = "chr1\tsrc\tgene\t1\t10\t.\t?\t.\t.".parse().unwrap();
        assert_eq!(f.strand, Strand::Unstranded);
    }
}
