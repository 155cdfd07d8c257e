//! 语义错误。

use thiserror::Error;

use super::Rate;

/// 校验、展开与输出过程中的错误。任何一个错误都会中止整个编译。
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no module named `{0}` to compile")]
    NoMainModule(String),

    #[error("module `{0}` is defined more than once")]
    MultipleModulesWithSameName(String),

    #[error("no module named `{0}` has been defined; maybe it is defined below the current module?")]
    NoSuchModule(String),

    #[error("species `{species}` is not declared in module `{module}`")]
    SpecieNotDeclared { species: String, module: String },

    #[error("species `{species}` is declared more than once in module `{module}`")]
    SpecieRedeclared { species: String, module: String },

    #[error("cannot set the concentration of input species `{species}` in module `{module}`")]
    InputSpecieConc { species: String, module: String },

    #[error("in function `{0}`: every reactant must also be a product of the same reaction")]
    FunctionIncorrectReactions(String),

    #[error("{0}")]
    Composition(String),

    #[error("module `{from}` cannot set the concentration of `{species}`, an input of module `{to}`")]
    MapConcForSubModule {
        species: String,
        from: String,
        to: String,
    },

    #[error("rate {rate} scaled by {factor} is out of range")]
    RateOverflow { rate: Rate, factor: Rate },
}
