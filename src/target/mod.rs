//! 编译目标

use std::path::Path;

use anyhow::Result;

use crate::{crn::Module, options::Options};

mod script;
pub use script::Script;

/// 编译目标
pub trait Target {
    /// 将展开后的根模块写入流。
    fn write(f: impl std::io::Write, module: &Module, options: &Options) -> Result<()>;

    /// 将展开后的根模块写入文件。
    fn write_to_file(filename: impl AsRef<Path>, module: &Module, options: &Options) -> Result<()> {
        let mut f = std::fs::File::create(filename)?;
        Self::write(&mut f, module, options)
    }
}
