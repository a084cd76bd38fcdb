pub mod comment;
pub mod issue;
pub mod label;
pub mod milestone;
pub mod project;

pub use comment::*;
pub use issue::*;
pub use label::*;
pub use milestone::*;
pub use project::*;
