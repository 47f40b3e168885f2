use indexmap::IndexMap;

/// The ninth column of a GFF/GTF record.
///
/// Keys are unique and keep their first-insertion order; each key holds an
/// ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, Vec<String>>);

impl Attributes {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(|v| v.as_slice())
    }

    /// First value of `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|v| v.first())
            .map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Replaces all values of `key`. A new key goes to the end, an existing key
    /// keeps its position.
    pub fn insert(&mut self, key: &str, values: Vec<String>) {
        self.0.insert(key.to_string(), values);
    }

    /// Appends `value` to `key`, creating the key if needed.
    ///
    /// ```
    /// # use featmerge::libs::gff::Attributes;
    /// let mut attrs = Attributes::new();
    /// attrs.push("Parent", "g1");
    /// attrs.push("Parent", "g2");
    /// assert_eq!(attrs.get("Parent").unwrap(), &["g1", "g2"]);
    /// ```
    pub fn push(&mut self, key: &str, value: &str) {
        self.0
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Appends the values not already present under `key`.
    pub fn push_unique<'a, I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        let entry = self.0.entry(key.to_string()).or_default();
        for value in values {
            if !entry.contains(value) {
                entry.push(value.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Parses `ID=g1;Name=abc;Alias=x,y`
    ///
    /// ```
    /// # use featmerge::libs::gff::Attributes;
    /// let attrs = Attributes::parse_gff3("ID=g1;Alias=x,y;");
    /// assert_eq!(attrs.first("ID"), Some("g1"));
    /// assert_eq!(attrs.get("Alias").unwrap(), &["x", "y"]);
    /// assert_eq!(attrs.to_gff3(), "ID=g1;Alias=x,y");
    /// ```
    pub fn parse_gff3(field: &str) -> Self {
        let mut attrs = Self::new();
        if field == "." {
            return attrs;
        }

        for part in field.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((key, value)) => {
                    let entry = attrs.0.entry(key.trim().to_string()).or_default();
                    entry.extend(value.split(',').map(|v| v.to_string()));
                }
                None => {
                    attrs.0.entry(part.to_string()).or_default();
                }
            }
        }

        attrs
    }

    /// Parses `gene_id "g1"; transcript_id "t1";`. Repeated keys collect
    /// their values in order.
    ///
    /// ```
    /// # use featmerge::libs::gff::Attributes;
    /// let attrs = Attributes::parse_gtf(r#"gene_id "g1"; tag "basic"; tag "CCDS";"#);
    /// assert_eq!(attrs.first("gene_id"), Some("g1"));
    /// assert_eq!(attrs.get("tag").unwrap(), &["basic", "CCDS"]);
    /// assert_eq!(attrs.to_gtf(), r#"gene_id "g1"; tag "basic"; tag "CCDS";"#);
    /// ```
    pub fn parse_gtf(field: &str) -> Self {
        let mut attrs = Self::new();
        if field == "." {
            return attrs;
        }

        for part in field.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once(char::is_whitespace) {
                Some((key, value)) => {
                    let value = value.trim().trim_matches('"');
                    attrs.push(key, value);
                }
                None => {
                    attrs.0.entry(part.to_string()).or_default();
                }
            }
        }

        attrs
    }

    pub fn to_gff3(&self) -> String {
        if self.is_empty() {
            return ".".to_string();
        }
        self.0
            .iter()
            .map(|(key, values)| {
                if values.is_empty() {
                    key.clone()
                } else {
                    format!("{}={}", key, values.join(","))
                }
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn to_gtf(&self) -> String {
        if self.is_empty() {
            return ".".to_string();
        }
        let mut parts = vec![];
        for (key, values) in &self.0 {
            if values.is_empty() {
                parts.push(format!("{};", key));
            }
            for value in values {
                parts.push(format!("{} \"{}\";", key, value));
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_skips_duplicates() {
        let mut attrs = Attributes::parse_gff3("Note=x");
        let incoming = vec!["x".to_string(), "y".to_string(), "x".to_string()];
        attrs.push_unique("Note", &incoming);
        assert_eq!(attrs.get("Note").unwrap(), &["x", "y"]);
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut attrs = Attributes::parse_gff3("ID=a;Name=b");
        attrs.insert("ID", vec!["c".to_string()]);
        assert_eq!(attrs.to_gff3(), "ID=c;Name=b");
    }

    #[test]
    fn test_empty_field() {
        assert!(Attributes::parse_gff3(".").is_empty());
        assert!(Attributes::parse_gtf(".").is_empty());
        assert_eq!(Attributes::new().to_gff3(), ".");
    }

    #[test]
    fn test_flag_key() {
        let attrs = Attributes::parse_gff3("ID=a;partial");
        assert!(attrs.contains_key("partial"));
        assert_eq!(attrs.to_gff3(), "ID=a;partial");
    }
}
