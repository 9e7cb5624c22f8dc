pub mod manager;
pub mod persistence;
pub mod reconciler;
pub mod snapshot;
pub mod types;


pub use manager::*;
pub use persistence::*;
pub use reconciler::*;
pub use snapshot::*;
pub use types::*;
