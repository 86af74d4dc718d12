pub mod id;
pub mod registry;
