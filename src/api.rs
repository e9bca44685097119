pub mod profile;
pub mod salary;
