//! 物种与反应。

use std::fmt::Display;

use super::Rate;

/// 物种。按名称比较和排序。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Species(String);

impl Species {
    /// 表示“无”的保留物种名。
    pub const NOTHING: &'static str = "0";

    /// 创建一个物种。
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 保留物种 `0`。
    pub fn nothing() -> Self {
        Self::new(Self::NOTHING)
    }

    /// 物种名称。
    pub fn name(&self) -> &str {
        &self.0
    }

    /// 是否为保留物种 `0`。
    pub fn is_nothing(&self) -> bool {
        self.0 == Self::NOTHING
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Species {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// 反应式中的一项，如 `2x`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    /// 物种
    pub species: Species,
    /// 系数，总是正数
    pub coefficient: u32,
}

impl Term {
    /// 创建一项。
    pub fn new(species: impl Into<Species>, coefficient: u32) -> Self {
        Self {
            species: species.into(),
            coefficient,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.coefficient == 1 {
            write!(f, "{}", self.species)
        } else {
            write!(f, "{}{}", self.coefficient, self.species)
        }
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Self::new(name, 1)
    }
}

/// 反应。没有速率时视为速率 1，且输出时省略。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reaction {
    /// 反应物
    pub reactants: Vec<Term>,
    /// 生成物
    pub products: Vec<Term>,
    /// 速率
    pub rate: Option<Rate>,
}

impl Reaction {
    /// 创建一个反应。
    pub fn new(reactants: Vec<Term>, products: Vec<Term>, rate: Option<Rate>) -> Self {
        Self {
            reactants,
            products,
            rate,
        }
    }

    /// 反应中出现的所有物种，先反应物后生成物。
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|term| &term.species)
    }

    /// 按 `rename` 替换所有物种，系数和速率不变。
    pub fn renamed(&self, rename: impl Fn(&Species) -> Species) -> Self {
        let map = |terms: &[Term]| -> Vec<Term> {
            terms
                .iter()
                .map(|term| Term {
                    species: rename(&term.species),
                    coefficient: term.coefficient,
                })
                .collect()
        };
        Self {
            reactants: map(&self.reactants),
            products: map(&self.products),
            rate: self.rate,
        }
    }

    /// 速率乘以 `factor`，没有速率的反应按速率 1 计算。溢出时返回 `None`。
    pub fn scaled(&self, factor: Rate) -> Option<Self> {
        let rate = self.rate.unwrap_or(Rate::ONE).checked_mul(factor)?;
        Some(Self {
            rate: Some(rate),
            ..self.clone()
        })
    }
}

fn fmt_side(f: &mut std::fmt::Formatter<'_>, terms: &[Term]) -> std::fmt::Result {
    if terms.is_empty() {
        return f.write_str(Species::NOTHING);
    }
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(" + ")?;
        }
        write!(f, "{}", term)?;
    }
    Ok(())
}

impl Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_side(f, &self.reactants)?;
        match &self.rate {
            Some(rate) => write!(f, " ->({}) ", rate)?,
            None => f.write_str(" -> ")?,
        }
        fmt_side(f, &self.products)?;
        f.write_str(";")
    }
}
