pub mod interval;

pub use interval::is_number_in_interval;
