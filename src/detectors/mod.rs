pub mod pattern;
pub mod roles;
pub mod violations;
