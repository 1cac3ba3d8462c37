mod pair_table;
pub use pair_table::PairTable;
