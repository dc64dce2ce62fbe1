//! Study materials: records, their providers, and the folder tree derived
//! from `/`-delimited material titles.

pub mod navigator;
pub mod path;
pub mod record;
pub mod search;
pub mod source;
pub mod tree;
