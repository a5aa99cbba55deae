pub mod catalog;
pub mod disguise;
pub mod document;
pub mod identity;
pub mod pipeline;
pub mod storage;
pub mod topology;
pub mod tuning;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;
