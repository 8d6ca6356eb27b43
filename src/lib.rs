/*
    Grammars over single-character symbols and a top-down parser that
    tests strings against them
*/

pub mod engine;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod shell;
pub mod tree;
