pub mod couples;
pub mod error;
pub mod matrix;
pub mod report;
