pub mod company;
pub mod report;
pub mod response;

pub use company::*;
pub use report::*;
pub use response::*;
