mod compressed_file_reader;
pub mod compression_utils;

pub use self::compressed_file_reader::*;
pub use self::compression_utils::*;
