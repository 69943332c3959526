mod configuration;
mod download;
mod linked;
mod sync;

pub use configuration::*;
pub use download::*;
pub use linked::*;
pub use sync::*;
