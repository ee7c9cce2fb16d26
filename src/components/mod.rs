pub mod history;
pub mod masks;
pub mod tools;
