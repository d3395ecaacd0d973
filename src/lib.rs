pub mod container;
pub mod error;
pub mod plate_type;
pub mod stamp;
pub mod unit;
pub mod well;
