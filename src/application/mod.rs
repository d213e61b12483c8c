pub mod compose;
pub mod contact;
pub mod error;
