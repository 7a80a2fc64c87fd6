mod deferred;
mod synthetic;

pub use deferred::DeferredTask;
pub use synthetic::{JobHandle, SyntheticContactJob};
