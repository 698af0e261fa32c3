pub mod dna;
pub mod tag;
pub mod version;
