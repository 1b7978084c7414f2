pub mod admin;
pub mod announcement;
pub mod contributor;
pub mod document;

pub use admin::*;
pub use announcement::*;
pub use contributor::*;
pub use document::*;
