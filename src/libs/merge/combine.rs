//! Attributes, source and identifier of a merged record.

use crate::libs::gff::{Attributes, Feature};
use itertools::Itertools;
use xxhash_rust::xxh3::xxh3_64;

/// Featuretype of records merged across types (SO:0000110)
pub const GENERIC_FEATURETYPE: &str = "sequence_feature";

pub const ID_PREFIX: &str = "merged";
pub const ID_SEPARATOR: &str = "_";

/// Longer identifiers are replaced by their hash
pub const MAX_ID_LEN: usize = 32;

/// Identifier of a component, synthesized from its location when absent
pub fn component_id(feature: &Feature) -> String {
    match &feature.id {
        Some(id) => id.clone(),
        None => format!(
            "{}_{}_{}_{}",
            feature.featuretype, feature.seqid, feature.start, feature.stop
        ),
    }
}

/// `merged_<id1>_<id2>...`, or the 16-digit XXH3-64 hex digest of that string
/// when it is longer than `MAX_ID_LEN`.
///
/// ```
/// # use featmerge::libs::gff::Feature;
/// # use featmerge::libs::merge::combine::merged_id;
/// let a = Feature::new("chr1", "gene", 1, 10).with_id("a");
/// let b = Feature::new("chr1", "gene", 5, 20).with_id("b");
/// assert_eq!(merged_id(&[a.clone(), b.clone()]), "merged_a_b");
///
/// let long = Feature::new("chr1", "gene", 5, 20).with_id("a_rather_long_identifier");
/// let id = merged_id(&[a, long]);
/// assert_eq!(id.len(), 16);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn merged_id(components: &[Feature]) -> String {
    let joined = std::iter::once(ID_PREFIX.to_string())
        .chain(components.iter().map(component_id))
        .join(ID_SEPARATOR);

    if joined.len() > MAX_ID_LEN {
        hash_id(&joined)
    } else {
        joined
    }
}

/// Seed-free XXH3-64, so the digest is stable across runs and platforms
pub fn hash_id(s: &str) -> String {
    format!("{:016x}", xxh3_64(s.as_bytes()))
}

/// Distinct sources in first-seen order, joined by `,`
pub fn merged_source(components: &[Feature]) -> String {
    components.iter().map(|f| f.source.as_str()).unique().join(",")
}

/// Per-key union of the component attributes in component order, exact
/// duplicate values dropped. `ID` is left out.
pub fn merged_attributes(components: &[Feature]) -> Attributes {
    let mut attrs = Attributes::new();
    for component in components {
        for (key, values) in component.attributes.iter() {
            if key == "ID" {
                continue;
            }
            attrs.push_unique(key, values);
        }
    }
    attrs
}

/// Completes `merged` from its components and links every component back to
/// it through `Parent`.
pub fn build(mut merged: Feature, mut components: Vec<Feature>) -> Feature {
    let id = merged_id(&components);
    merged.source = merged_source(&components);

    let mut attributes = Attributes::new();
    attributes.insert("ID", vec![id.clone()]);
    for (key, values) in merged_attributes(&components).iter() {
        attributes.push_unique(key, values);
    }
    merged.attributes = attributes;

    for component in components.iter_mut() {
        component.attributes.push("Parent", &id);
    }

    log::debug!(
        "Merged {} records into {} {}:{}-{}",
        components.len(),
        id,
        merged.seqid,
        merged.start,
        merged.stop
    );
    merged.id = Some(id);
    merged.children = components;
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_union() {
        let a = Feature::new("chr1", "gene", 1, 10).with_attribute("Note", "x");
        let b = Feature::new("chr1", "gene", 5, 20).with_attribute("Note", "y");
        let attrs = merged_attributes(&[a, b]);
        assert_eq!(attrs.get("Note").unwrap(), &["x", "y"]);
    }

    #[test]
    fn test_attribute_union_dedup() {
        let a = Feature::new("chr1", "gene", 1, 10).with_attribute("Note", "x");
        let b = Feature::new("chr1", "gene", 5, 20).with_attribute("Note", "x");
        let attrs = merged_attributes(&[a, b]);
        assert_eq!(attrs.get("Note").unwrap(), &["x"]);
    }

    #[test]
    fn test_source_dedup_keeps_first_seen_order() {
        let mut a = Feature::new("chr1", "gene", 1, 10);
        a.source = "prodigal".to_string();
        let mut b = Feature::new("chr1", "gene", 5, 20);
        b.source = "glimmer".to_string();
        let mut c = Feature::new("chr1", "gene", 8, 20);
        c.source = "prodigal".to_string();
        assert_eq!(merged_source(&[a, b, c]), "prodigal,glimmer");
    }

    #[test]
    fn test_component_id_synthesized() {
        let f = Feature::new("chr1", "gene", 1, 10);
        assert_eq!(component_id(&f), "gene_chr1_1_10");
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_id("merged_a_b"), hash_id("merged_a_b"));
        assert_ne!(hash_id("merged_a_b"), hash_id("merged_b_a"));
        assert_eq!(hash_id("").len(), 16);
    }

    #[test]
    fn test_id_length_threshold() {
        let a = Feature::new("chr1", "gene", 1, 10).with_id("abcdefghijkl");
        let b = Feature::new("chr1", "gene", 1, 10).with_id("mnopqrstuvwx");
        let id = merged_id(&[a.clone(), b]);
        assert_eq!(id, "merged_abcdefghijkl_mnopqrstuvwx");
        assert_eq!(id.len(), MAX_ID_LEN);

        let c = Feature::new("chr1", "gene", 1, 10).with_id("mnopqrstuvwxy");
        let id = merged_id(&[a, c]);
        assert_eq!(id, hash_id("merged_abcdefghijkl_mnopqrstuvwxy"));
    }

    #[test]
    fn test_build_links_parents() {
        let a = Feature::new("chr1", "gene", 1, 10)
            .with_id("a")
            .with_attribute("Parent", "locus1");
        let b = Feature::new("chr1", "gene", 5, 20);
        let merged = build(Feature::new("chr1", "gene", 1, 20), vec![a, b]);

        assert_eq!(merged.id.as_deref(), Some("merged_a_gene_chr1_5_20"));
        assert_eq!(merged.attributes.first("ID"), merged.id.as_deref());
        assert_eq!(merged.attributes.get("Parent").unwrap(), &["locus1"]);

        let children = merged.components();
        assert_eq!(
            children[0].attributes.get("Parent").unwrap(),
            &["locus1", "merged_a_gene_chr1_5_20"]
        );
        // the synthesized name only feeds the merged ID
        assert_eq!(children[1].id, None);
        assert!(!children[1].attributes.contains_key("ID"));
        assert_eq!(
            children[1].attributes.get("Parent").unwrap(),
            &["merged_a_gene_chr1_5_20"]
        );
    }
}
