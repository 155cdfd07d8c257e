//! 带位置信息的语法检查。

use std::{collections::HashMap, fmt::Display};

use crate::{
    frontend::ast,
    utils::{error_snippet, Span},
};

/// 检查错误
#[derive(Debug, Clone, PartialEq)]
pub struct CheckError<'a> {
    /// 错误信息
    pub message: String,
    /// 出错的位置
    pub span: Span<'a, ()>,
    /// 位置上的标注
    pub label: String,
    /// 附加说明
    pub note: Option<String>,
}

impl<'a> CheckError<'a> {
    /// 创建一个检查错误。
    pub fn new<T>(message: impl Into<String>, span: &Span<'a, T>, label: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: span.location(),
            label: label.into(),
            note: None,
        }
    }

    /// 添加附加说明。
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// 渲染为带源码片段的错误信息。
    pub fn to_snippet(&self) -> String {
        error_snippet(&self.message, &self.span, &self.label, self.note.as_deref())
    }
}

impl<'a> Display for CheckError<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.message,
            self.span.filename,
            self.span.line()
        )
    }
}

fn check_unique<'a>(
    idents: impl IntoIterator<Item = &'a ast::Ident<'a>>,
    what: &str,
    module: &str,
) -> Result<(), CheckError<'a>> {
    let mut seen: HashMap<&str, &ast::Ident> = HashMap::new();
    for ident in idents {
        if let Some(first) = seen.insert(ident.into_inner(), ident) {
            return Err(CheckError::new(
                format!("{} `{}` appears more than once in module `{}`", what, ident, module),
                ident,
                "duplicated here",
            )
            .with_note(format!("first seen on line {}", first.line())));
        }
    }
    Ok(())
}

/// 每个物种只能声明一次（输入、输出、私有三者之间也不能重复）
pub fn check_declarations<'a>(module: &'a ast::Module<'a>) -> Result<(), CheckError<'a>> {
    let declarations = module
        .inputs
        .iter()
        .chain(module.outputs.iter())
        .chain(module.privates.iter());
    check_unique(declarations, "species", &module.name)
}

/// 每个物种的浓度只能设置一次
pub fn check_concentrations<'a>(module: &'a ast::Module<'a>) -> Result<(), CheckError<'a>> {
    let assigned = module.concentrations.iter().map(|a| &a.species);
    check_unique(assigned, "concentration of", &module.name)
}

/// 检查一个源文件中的所有模块
pub fn check_unit<'a>(unit: &'a ast::Unit<'a>) -> Result<(), CheckError<'a>> {
    for module in &unit.modules {
        check_declarations(module)?;
        check_concentrations(module)?;
    }
    Ok(())
}
