//! 抽象语法树

use std::fmt::Display;

use crate::utils::Span;

/// 标识符
pub type Ident<'a> = Span<'a, &'a str>;

/// 一个源文件
#[derive(Debug, Clone, PartialEq)]
pub struct Unit<'a> {
    /// 导入的文件
    pub imports: Vec<Span<'a, &'a str>>,
    /// 模块
    pub modules: Vec<Span<'a, Module<'a>>>,
}

/// 模块的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// `module`
    Module,
    /// `function`
    Function,
}

/// 模块定义
#[derive(Debug, Clone, PartialEq)]
pub struct Module<'a> {
    /// 种类
    pub kind: ModuleKind,
    /// 模块名
    pub name: Ident<'a>,
    /// 输入物种
    pub inputs: Vec<Ident<'a>>,
    /// 输出物种
    pub outputs: Vec<Ident<'a>>,
    /// 私有物种
    pub privates: Vec<Ident<'a>>,
    /// 初始浓度
    pub concentrations: Vec<Span<'a, Assignment<'a>>>,
    /// 反应
    pub reactions: Vec<Span<'a, Reaction<'a>>>,
    /// 组合
    pub compositions: Vec<Span<'a, Composition<'a>>>,
}

/// `x := 50;`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    /// 物种
    pub species: Ident<'a>,
    /// 浓度字面量
    pub value: Span<'a, &'a str>,
}

/// 反应式中的一项
#[derive(Debug, Clone, PartialEq)]
pub struct Term<'a> {
    /// 系数字面量
    pub coefficient: Option<Span<'a, &'a str>>,
    /// 物种
    pub species: Ident<'a>,
}

impl<'a> Display for Term<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(coefficient) = &self.coefficient {
            write!(f, "{}", coefficient)?;
        }
        write!(f, "{}", self.species)
    }
}

/// 反应
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction<'a> {
    /// 反应物，空表示 `0`
    pub reactants: Vec<Term<'a>>,
    /// 速率字面量
    pub rate: Option<Span<'a, &'a str>>,
    /// 生成物，空表示 `0`
    pub products: Vec<Term<'a>>,
}

fn fmt_side(f: &mut std::fmt::Formatter<'_>, terms: &[Term]) -> std::fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }
    write!(
        f,
        "{}",
        terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    )
}

impl<'a> Display for Reaction<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_side(f, &self.reactants)?;
        match &self.rate {
            Some(rate) => write!(f, " ->({}) ", rate)?,
            None => write!(f, " -> ")?,
        }
        fmt_side(f, &self.products)
    }
}

/// 组合
#[derive(Debug, Clone, PartialEq)]
pub enum Composition<'a> {
    /// `results = callee(arguments);`
    Call {
        /// 绑定输出的物种
        results: Vec<Ident<'a>>,
        /// 被调用的模块
        callee: Ident<'a>,
        /// 参数
        arguments: Vec<Ident<'a>>,
    },
    /// `scale(factor) { ... }`
    Scale {
        /// 缩放系数字面量
        factor: Span<'a, &'a str>,
        /// 内部的组合
        body: Vec<Span<'a, Composition<'a>>>,
    },
}

fn join(idents: &[Ident]) -> String {
    idents
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'a> Display for Composition<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Composition::Call {
                results,
                callee,
                arguments,
            } => {
                if !results.is_empty() {
                    write!(f, "[{}] = ", join(results))?;
                }
                write!(f, "{}({})", callee, join(arguments))
            }
            Composition::Scale { factor, body } => {
                write!(f, "scale({}) {{ ", factor)?;
                for composition in body {
                    write!(f, "{}; ", composition)?;
                }
                write!(f, "}}")
            }
        }
    }
}
