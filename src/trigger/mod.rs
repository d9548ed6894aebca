pub mod binder;
pub mod marker;
pub mod range;
