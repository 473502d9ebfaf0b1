mod section;
mod slide;

pub use section::*;
pub use slide::*;
