pub mod colors;
pub mod date;
pub mod formatting;
pub mod money;
pub mod path;
pub mod table;
