pub mod classifier;
pub mod context;
pub mod normalizer;
pub mod playbooks;
pub mod signals;
