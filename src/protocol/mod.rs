pub mod convert;
pub mod openai;
pub mod sensenova;
