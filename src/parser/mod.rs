pub mod address;

pub use address::AddressParser;
