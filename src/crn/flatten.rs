//! 展开组合。

use std::{collections::HashMap, rc::Rc};

use log::debug;

use super::{Error, Module, ModuleRegistry};

/// 一次展开过程。被调用的模块先展开，结果在本次过程中缓存。
pub struct Flattener<'r> {
    registry: &'r ModuleRegistry,
    flattened: HashMap<String, Rc<Module>>,
}

impl<'r> Flattener<'r> {
    /// 创建一次展开过程。
    pub fn new(registry: &'r ModuleRegistry) -> Self {
        Self {
            registry,
            flattened: HashMap::new(),
        }
    }

    /// 展开 `module` 的所有组合，返回展开后的副本。
    pub fn flatten(&mut self, module: &Module) -> Result<Module, Error> {
        let mut module = module.clone();
        module.apply_compositions(self)?;
        Ok(module)
    }

    /// 取得已展开的被调用模块。
    ///
    /// 只能调用在 `caller` 之前注册的模块，因此组合关系不会成环。
    pub fn callee(&mut self, name: &str, caller: &str) -> Result<Rc<Module>, Error> {
        let module = self
            .registry
            .resolve(name, caller)
            .ok_or_else(|| Error::NoSuchModule(name.to_string()))?;

        if let Some(module) = self.flattened.get(name) {
            return Ok(Rc::clone(module));
        }

        debug!("flattening module `{}`", name);
        let module = Rc::new(self.flatten(module)?);
        self.flattened.insert(name.to_string(), Rc::clone(&module));
        Ok(module)
    }
}
