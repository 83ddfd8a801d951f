pub mod probe;
pub mod scanner;
