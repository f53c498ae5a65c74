pub mod element;
pub mod error;
pub mod function;
pub mod object;
pub mod scope;
pub mod value;
