//! Subcommand modules for the `featmerge` binary.

pub mod merge;
pub mod types;

use featmerge::libs::store::{DuplicateStrategy, MemoryStore};

/// Loads every input into one store. Empty files contribute nothing.
pub fn load_store(infiles: &[&String], strategy: DuplicateStrategy) -> anyhow::Result<MemoryStore> {
    let mut store = MemoryStore::new(strategy);
    for infile in infiles {
        let reader = featmerge::reader(infile)?;
        let count = store
            .load(reader)
            .map_err(|e| anyhow::anyhow!("{}: {}", infile, e))?;
        log::info!("Read {} records from {}", count, infile);
    }
    Ok(store)
}
