pub mod data_type;
pub mod status;
pub mod value;
