pub mod format;
pub mod network;
pub mod wallet;
