pub mod history;
pub mod platform;
pub mod sampler;
pub mod snapshot;
