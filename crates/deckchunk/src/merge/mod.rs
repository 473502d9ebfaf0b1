mod audit;
mod load;
mod merger;
mod record;
mod reference;
mod relocate;

pub use audit::*;
pub use load::*;
pub use merger::*;
pub use record::*;
pub use reference::*;
pub use relocate::*;
