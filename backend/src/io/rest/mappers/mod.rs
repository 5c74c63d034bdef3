pub mod donor_mapper;
pub mod settings_mapper;
