//! 组合：在一个模块中实例化另一个模块。

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexSet;
use log::debug;

use super::{flatten::Flattener, Error, Rate, Reaction, Species};

/// 组合指令。
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    /// `results = callee(arguments)`
    Call {
        /// 被调用的模块名
        callee: String,
        /// 按位置绑定到被调用模块的输入物种
        arguments: Vec<Species>,
        /// 按位置绑定到被调用模块的输出物种
        results: Vec<Species>,
    },
    /// `scale(factor) { body }`，其中产生的所有反应速率乘以 `factor`
    Scale {
        /// 缩放系数
        factor: Rate,
        /// 内部的组合
        body: Vec<Composition>,
    },
}

/// 组合展开的目标：外层模块的各个集合。
pub struct Expansion<'m> {
    /// 外层模块名
    pub module: &'m str,
    /// 外层模块的输入物种
    pub inputs: &'m IndexSet<Species>,
    /// 外层模块的输出物种
    pub outputs: &'m IndexSet<Species>,
    /// 浓度输出
    pub concentrations: &'m mut BTreeMap<Species, u64>,
    /// 反应输出
    pub reactions: &'m mut Vec<Reaction>,
    /// 新产生的私有物种
    pub species: &'m mut IndexSet<Species>,
    /// 下一个实例编号
    pub next_instance: usize,
}

impl Composition {
    /// 创建一个调用组合。
    pub fn call<A, R>(
        callee: impl Into<String>,
        arguments: impl IntoIterator<Item = A>,
        results: impl IntoIterator<Item = R>,
    ) -> Self
    where
        A: Into<Species>,
        R: Into<Species>,
    {
        Composition::Call {
            callee: callee.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            results: results.into_iter().map(Into::into).collect(),
        }
    }

    /// 创建一个缩放组合。
    pub fn scale(factor: Rate, body: Vec<Composition>) -> Self {
        Composition::Scale { factor, body }
    }

    /// 组合中绑定的所有外层物种（包括嵌套的缩放块）。
    pub fn bindings(&self) -> Box<dyn Iterator<Item = &Species> + '_> {
        match self {
            Composition::Call {
                arguments, results, ..
            } => Box::new(arguments.iter().chain(results.iter())),
            Composition::Scale { body, .. } => Box::new(body.iter().flat_map(|c| c.bindings())),
        }
    }

    /// 把组合展开到 `out` 中。
    pub fn apply(&self, flattener: &mut Flattener<'_>, out: &mut Expansion<'_>) -> Result<(), Error> {
        match self {
            Composition::Call {
                callee,
                arguments,
                results,
            } => Self::apply_call(callee, arguments, results, flattener, out),
            Composition::Scale { factor, body } => Self::apply_scale(*factor, body, flattener, out),
        }
    }

    fn apply_call(
        callee: &str,
        arguments: &[Species],
        results: &[Species],
        flattener: &mut Flattener<'_>,
        out: &mut Expansion<'_>,
    ) -> Result<(), Error> {
        let module = flattener.callee(callee, out.module)?;

        if arguments.len() != module.input_species.len()
            || results.len() != module.output_species.len()
        {
            return Err(Error::Composition(format!(
                "wrong arity: module `{}` takes {} input(s) and {} output(s), \
                 but module `{}` binds {} argument(s) and {} result(s)",
                callee,
                module.input_species.len(),
                module.output_species.len(),
                out.module,
                arguments.len(),
                results.len(),
            )));
        }

        let scope = format!("{}_{}_", callee, out.next_instance);
        out.next_instance += 1;
        debug!("inlining `{}` into `{}` as `{}`", callee, out.module, scope);

        let mut substitution: HashMap<&Species, Species> = HashMap::new();
        substitution.extend(module.input_species.iter().zip(arguments.iter().cloned()));
        substitution.extend(module.output_species.iter().zip(results.iter().cloned()));
        substitution.extend(
            module
                .private_species
                .iter()
                .map(|s| (s, Species::new(format!("{}{}", scope, s)))),
        );
        let rename = |s: &Species| substitution.get(s).cloned().unwrap_or_else(|| s.clone());

        // 带作用域的私有物种必须是外层模块中的新名字。
        for species in module.private_species.iter().map(rename) {
            if out.inputs.contains(&species)
                || out.outputs.contains(&species)
                || out.species.contains(&species)
            {
                return Err(Error::SpecieRedeclared {
                    species: species.to_string(),
                    module: out.module.to_string(),
                });
            }
        }

        for (species, &value) in &module.concentrations {
            let target = rename(species);
            if out.inputs.contains(&target) {
                return Err(Error::MapConcForSubModule {
                    species: target.to_string(),
                    from: callee.to_string(),
                    to: out.module.to_string(),
                });
            }
            out.concentrations.entry(target).or_insert(value);
        }

        out.reactions
            .extend(module.reactions.iter().map(|r| r.renamed(rename)));

        out.species
            .extend(module.private_species.iter().map(rename));

        Ok(())
    }

    fn apply_scale(
        factor: Rate,
        body: &[Composition],
        flattener: &mut Flattener<'_>,
        out: &mut Expansion<'_>,
    ) -> Result<(), Error> {
        let mut collected = Vec::new();
        let mut inner = Expansion {
            module: out.module,
            inputs: out.inputs,
            outputs: out.outputs,
            concentrations: &mut *out.concentrations,
            reactions: &mut collected,
            species: &mut *out.species,
            next_instance: out.next_instance,
        };
        for composition in body {
            composition.apply(flattener, &mut inner)?;
        }
        out.next_instance = inner.next_instance;

        for reaction in collected {
            let scaled = reaction.scaled(factor).ok_or(Error::RateOverflow {
                rate: reaction.rate.unwrap_or(Rate::ONE),
                factor,
            })?;
            out.reactions.push(scaled);
        }
        Ok(())
    }
}
