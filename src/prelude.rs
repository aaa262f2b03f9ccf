#[doc(no_inline)]
pub use crate::lines::LineRead as _;
#[doc(no_inline)]
pub use crate::scanner::ReadRecord as _;
