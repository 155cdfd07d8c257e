//! 输出 crnsimul 脚本

use anyhow::Result;

use crate::{crn::Module, options::Options};

/// crnsimul 脚本
pub struct Script;

impl super::Target for Script {
    fn write(mut f: impl std::io::Write, module: &Module, options: &Options) -> Result<()> {
        f.write_all(module.compile(options).as_bytes())?;
        Ok(())
    }
}

impl Script {
    const INTERPRETER: &'static str = "#!/usr/bin/env -S crnsimul -e -P";

    fn header(module: &Module) -> String {
        if module.output_species.is_empty() {
            return format!("{}\n", Self::INTERPRETER);
        }
        let outputs = module
            .output_species
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(",");
        format!("{} -C {}\n", Self::INTERPRETER, outputs)
    }
}

impl Module {
    /// 输出为脚本。模块必须已经展开。
    ///
    /// 浓度按物种名排序，反应按展开时的顺序。
    pub fn compile(&self, options: &Options) -> String {
        debug_assert!(self.compositions.is_empty(), "module is not flattened");

        let mut script = String::new();
        if options.header {
            script.push_str(&Script::header(self));
        }
        for (species, value) in &self.concentrations {
            script.push_str(&format!("{} := {};\n", species, value));
        }
        for reaction in &self.reactions {
            script.push_str(&format!("{}\n", reaction));
        }
        script
    }
}
