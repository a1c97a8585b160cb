pub mod convert;
pub mod encode;
pub mod grade;
pub mod helpers;
pub mod lang;
pub mod question;
pub mod raw_question;
pub mod text;
pub mod tree;
pub mod xml;

pub use convert::{convert, convert_tree, Conversion, Diagnostic, Options};
pub use question::Question;
