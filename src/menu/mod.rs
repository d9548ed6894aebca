pub mod links;
pub mod machine;
