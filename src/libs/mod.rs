pub mod error;
pub mod gff;
pub mod io;
pub mod merge;
pub mod store;
