use super::{Dialect, Feature};
use crate::libs::error::MergeError;
use std::io::BufRead;

/// Streams records out of a GFF3 or GTF file.
///
/// Comment and directive lines are skipped; an embedded `##FASTA` section ends
/// the stream. The dialect of the first record with a non-empty attribute
/// column is remembered in `dialect()`.
pub struct GffReader<R> {
    reader: R,
    line_no: usize,
    dialect: Option<Dialect>,
    done: bool,
}

impl<R: BufRead> GffReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            dialect: None,
            done: false,
        }
    }

    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }

    fn read_line(&mut self) -> Result<Option<String>, MergeError> {
        let mut buf = String::new();
        let n = self
            .reader
            .read_line(&mut buf)
            .map_err(|e| MergeError::parse(e.to_string()).at_line(self.line_no + 1))?;
        if n == 0 {
            Ok(None)
        } else {
            self.line_no += 1;
            Ok(Some(buf))
        }
    }
}

impl<R: BufRead> Iterator for GffReader<R> {
    type Item = Result<Feature, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("##FASTA") || trimmed.starts_with('>') {
                self.done = true;
                return None;
            }
            if trimmed.starts_with('#') {
                continue;
            }

            return match Feature::parse(&line) {
                Ok((feature, dialect)) => {
                    if self.dialect.is_none() {
                        self.dialect = dialect;
                    }
                    Some(Ok(feature))
                }
                Err(e) => Some(Err(e.at_line(self.line_no))),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_comments_and_stops_at_fasta() {
        let input = "\
##gff-version 3
# a comment

chr1\t.\tgene\t1\t10\t.\t+\t.\tID=g1
chr1\t.\tgene\t20\t30\t.\t+\t.\tID=g2
##FASTA
>chr1
ACGT
";
        let mut reader = GffReader::new(input.as_bytes());
        let features: Vec<Feature> = reader.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1].id.as_deref(), Some("g2"));
        assert_eq!(reader.dialect(), Some(Dialect::Gff3));
    }

    #[test]
    fn test_reports_line_number() {
        let input = "##gff-version 3\nchr1\t.\tgene\t1\t10\t.\t+\t.\tID=g1\nbroken line\n";
        let results: Vec<_> = GffReader::new(input.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        match &results[1] {
            Err(MergeError::Parse { line, .. }) => assert_eq!(*line, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        let mut reader = GffReader::new("".as_bytes());
        assert!(reader.next().is_none());
        assert_eq!(reader.dialect(), None);
    }
}
