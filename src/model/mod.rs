pub mod attachment;
pub mod conversion;
pub mod definition;
pub mod go_to;
pub mod tree;

pub use attachment::*;
pub use conversion::*;
pub use definition::*;
pub use go_to::*;
pub use tree::*;
