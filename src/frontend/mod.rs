//! 编译器前端：语法解析、检查，以及到 [`crate::crn`] 的转换。

pub mod ast;
pub mod check;
pub mod lower;
pub mod parser;
