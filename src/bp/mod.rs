#[allow(clippy::module_inception)]
mod bp;
mod properties;

pub use bp::BP;
pub use properties::{BPProperties, UpdateType};
