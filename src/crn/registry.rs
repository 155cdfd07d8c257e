//! 模块表。

use indexmap::IndexMap;
use log::debug;

use crate::options::Options;

use super::{flatten::Flattener, Error, Module};

/// 按声明顺序保存的模块表。
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: IndexMap<String, Module>,
}

impl ModuleRegistry {
    /// 创建一个空的模块表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验并注册一个模块。
    pub fn register(&mut self, module: Module) -> Result<&mut Self, Error> {
        if self.modules.contains_key(&module.name) {
            return Err(Error::MultipleModulesWithSameName(module.name));
        }
        module.verify()?;
        debug!("registered module `{}`", module.name);
        self.modules.insert(module.name.clone(), module);
        Ok(self)
    }

    /// 按名称查找模块。
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// 查找 `caller` 可以调用的模块，即在 `caller` 之前注册的模块。
    ///
    /// 不在表中的 `caller` 可以调用任何模块。
    pub fn resolve(&self, name: &str, caller: &str) -> Option<&Module> {
        let (index, _, module) = self.modules.get_full(name)?;
        match self.modules.get_index_of(caller) {
            Some(caller) if index >= caller => None,
            _ => Some(module),
        }
    }

    /// 按声明顺序遍历模块。
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// 模块数量。
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// 是否没有模块。
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// 展开指定模块。
    pub fn flatten(&self, name: &str) -> Result<Module, Error> {
        let module = self
            .get(name)
            .ok_or_else(|| Error::NoSuchModule(name.to_string()))?;
        Flattener::new(self).flatten(module)
    }

    /// 展开根模块。
    pub fn flatten_root(&self, root: &str) -> Result<Module, Error> {
        let module = self
            .get(root)
            .ok_or_else(|| Error::NoMainModule(root.to_string()))?;
        Flattener::new(self).flatten(module)
    }

    /// 展开根模块并输出脚本。
    pub fn compile(&self, options: &Options) -> Result<String, Error> {
        Ok(self.flatten_root(&options.root)?.compile(options))
    }
}
