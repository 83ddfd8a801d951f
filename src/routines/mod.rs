pub mod balance_check;
pub mod routine;
