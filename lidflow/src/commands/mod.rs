pub mod serve;
pub mod submit;
pub mod telegram;
