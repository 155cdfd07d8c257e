//! 模块。

use std::collections::BTreeMap;

use indexmap::IndexSet;

use super::{
    composition::Expansion, flatten::Flattener, Composition, Error, Reaction, Species,
};

/// 模块：物种声明、初始浓度、反应，以及尚未展开的组合。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    /// 模块名
    pub name: String,
    /// 是否以 `function` 声明
    pub function: bool,
    /// 输入物种
    pub input_species: IndexSet<Species>,
    /// 输出物种
    pub output_species: IndexSet<Species>,
    /// 私有物种
    pub private_species: IndexSet<Species>,
    /// 初始浓度，按物种名排序
    pub concentrations: BTreeMap<Species, u64>,
    /// 反应
    pub reactions: Vec<Reaction>,
    /// 待展开的组合
    pub compositions: Vec<Composition>,
}

impl Module {
    /// 创建一个空模块。
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 物种是否在本模块中声明。保留物种 `0` 总是视为已声明。
    pub fn declares(&self, species: &Species) -> bool {
        species.is_nothing()
            || self.input_species.contains(species)
            || self.output_species.contains(species)
            || self.private_species.contains(species)
    }

    fn not_declared(&self, species: &Species) -> Error {
        Error::SpecieNotDeclared {
            species: species.to_string(),
            module: self.name.clone(),
        }
    }

    /// 语义检查，返回遇到的第一个错误。
    pub fn verify(&self) -> Result<(), Error> {
        self.verify_disjoint()?;

        for reaction in &self.reactions {
            if let Some(species) = reaction.species().find(|s| !self.declares(s)) {
                return Err(self.not_declared(species));
            }
        }

        for species in self.concentrations.keys() {
            if self.input_species.contains(species) {
                return Err(Error::InputSpecieConc {
                    species: species.to_string(),
                    module: self.name.clone(),
                });
            }
            if !self.declares(species) {
                return Err(self.not_declared(species));
            }
        }

        for composition in &self.compositions {
            if let Some(species) = composition.bindings().find(|s| !self.declares(s)) {
                return Err(self.not_declared(species));
            }
        }

        if self.function {
            self.verify_function()?;
        }
        Ok(())
    }

    fn verify_disjoint(&self) -> Result<(), Error> {
        let classes = [
            &self.input_species,
            &self.output_species,
            &self.private_species,
        ];
        for (i, class) in classes.iter().enumerate() {
            for other in &classes[i + 1..] {
                if let Some(species) = class.iter().find(|s| other.contains(*s)) {
                    return Err(Error::SpecieRedeclared {
                        species: species.to_string(),
                        module: self.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// 函数模块检查：每个反应物也必须是同一反应的生成物。
    pub fn verify_function(&self) -> Result<(), Error> {
        let closed = |reaction: &Reaction| {
            reaction.reactants.iter().all(|reactant| {
                let species = &reactant.species;
                species.is_nothing() || reaction.products.iter().any(|p| &p.species == species)
            })
        };
        if self.reactions.iter().all(closed) {
            Ok(())
        } else {
            Err(Error::FunctionIncorrectReactions(self.name.clone()))
        }
    }

    /// 依次展开所有待展开的组合，结果并入本模块。完成后组合列表为空。
    pub fn apply_compositions(&mut self, flattener: &mut Flattener<'_>) -> Result<(), Error> {
        let compositions = std::mem::take(&mut self.compositions);
        let mut expansion = Expansion {
            module: &self.name,
            inputs: &self.input_species,
            outputs: &self.output_species,
            concentrations: &mut self.concentrations,
            reactions: &mut self.reactions,
            species: &mut self.private_species,
            next_instance: 0,
        };
        for composition in &compositions {
            composition.apply(flattener, &mut expansion)?;
        }
        Ok(())
    }
}
