use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// A malformed GFF/GTF record
    Parse {
        /// The line number (1-based), 0 when unknown
        line: usize,
        /// A human-readable message explaining the error
        message: String,
    },
    /// Two input records share an ID and cannot be folded together
    DuplicateId { id: String },
    /// A featuretype listed in more than one merge group
    DuplicateType { featuretype: String },
    /// `ALL` listed in more than one merge group
    DuplicateAll,
    /// `ALL` or `NONE` listed together with featuretypes in one group
    MixedGroup { group: String },
    /// The criteria chain never looks at coordinates
    NoCoordinateCriterion,
}

impl MergeError {
    pub fn parse(message: impl Into<String>) -> Self {
        MergeError::Parse {
            line: 0,
            message: message.into(),
        }
    }

    /// Attaches a line number to a parse error
    pub fn at_line(self, line: usize) -> Self {
        match self {
            MergeError::Parse { message, .. } => MergeError::Parse { line, message },
            other => other,
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::Parse { line, message } => {
                if *line > 0 {
                    write!(f, "Parse error at line {}: {}", line, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            MergeError::DuplicateId { id } => {
                write!(f, "Duplicate ID with conflicting records: {}", id)
            }
            MergeError::DuplicateType { featuretype } => write!(
                f,
                "Featuretype {} appears in more than one merge group",
                featuretype
            ),
            MergeError::DuplicateAll => write!(f, "ALL appears in more than one merge group"),
            MergeError::MixedGroup { group } => write!(
                f,
                "Merge group {} mixes ALL or NONE with featuretypes",
                group
            ),
            MergeError::NoCoordinateCriterion => write!(
                f,
                "Merge criteria must include a coordinate criterion (overlap or exact)"
            ),
        }
    }
}

impl std::error::Error for MergeError {}
