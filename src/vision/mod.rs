pub mod cluster;
pub mod filter;
pub mod ocr;
pub mod phrase;
