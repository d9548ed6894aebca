pub mod ease;
pub mod property;
pub mod value;
