pub mod donor;
pub mod settings;
