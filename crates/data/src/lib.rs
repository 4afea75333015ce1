pub mod csv_writer;
pub mod decode;
pub mod replay;

pub use csv_writer::write_csv;
pub use decode::decode_output;
pub use replay::ReplaySource;
