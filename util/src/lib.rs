pub mod error;

pub use bitcode;
