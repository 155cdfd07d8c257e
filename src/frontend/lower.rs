//! 把抽象语法树转换为 [`crn::Module`]。

use indexmap::IndexSet;

use crate::{
    crn::{self, Rate},
    frontend::{ast, check::CheckError},
    utils::Span,
};

fn parse_rate<'a>(literal: &Span<'a, &'a str>, what: &str) -> Result<Rate, CheckError<'a>> {
    literal
        .parse::<Rate>()
        .map_err(|e| CheckError::new(format!("invalid {}", what), literal, e.to_string()))
}

fn parse_count<'a, T: std::str::FromStr>(
    literal: &Span<'a, &'a str>,
    what: &str,
) -> Result<T, CheckError<'a>> {
    literal
        .parse::<T>()
        .map_err(|_| CheckError::new(format!("invalid {}", what), literal, "out of range"))
}

fn lower_term<'a>(term: &ast::Term<'a>) -> Result<crn::Term, CheckError<'a>> {
    let coefficient = match &term.coefficient {
        Some(literal) => {
            let coefficient: u32 = parse_count(literal, "coefficient")?;
            if coefficient == 0 {
                return Err(CheckError::new(
                    "invalid coefficient",
                    literal,
                    "coefficient must be positive",
                ));
            }
            coefficient
        }
        None => 1,
    };
    Ok(crn::Term::new(*term.species, coefficient))
}

fn lower_reaction<'a>(reaction: &ast::Reaction<'a>) -> Result<crn::Reaction, CheckError<'a>> {
    let side = |terms: &[ast::Term<'a>]| terms.iter().map(lower_term).collect::<Result<Vec<_>, _>>();
    let rate = match &reaction.rate {
        Some(literal) => Some(parse_rate(literal, "rate")?),
        None => None,
    };
    Ok(crn::Reaction::new(
        side(&reaction.reactants)?,
        side(&reaction.products)?,
        rate,
    ))
}

/// 组合按从后往前的顺序排队：最后写出的组合最先展开。
fn lower_compositions<'a>(
    compositions: &[Span<'a, ast::Composition<'a>>],
) -> Result<Vec<crn::Composition>, CheckError<'a>> {
    compositions
        .iter()
        .rev()
        .map(|composition| match &**composition {
            ast::Composition::Call {
                results,
                callee,
                arguments,
            } => Ok(crn::Composition::call(
                callee.into_inner(),
                arguments.iter().map(|s| s.into_inner()),
                results.iter().map(|s| s.into_inner()),
            )),
            ast::Composition::Scale { factor, body } => Ok(crn::Composition::scale(
                parse_rate(factor, "scale factor")?,
                lower_compositions(body)?,
            )),
        })
        .collect()
}

/// 转换一个模块。
pub fn lower_module<'a>(module: &ast::Module<'a>) -> Result<crn::Module, CheckError<'a>> {
    let species = |idents: &[ast::Ident<'a>]| -> IndexSet<crn::Species> {
        idents
            .iter()
            .map(|ident| crn::Species::new(ident.into_inner()))
            .collect()
    };

    let mut lowered = crn::Module::new(module.name.into_inner());
    lowered.function = module.kind == ast::ModuleKind::Function;
    lowered.input_species = species(&module.inputs);
    lowered.output_species = species(&module.outputs);
    lowered.private_species = species(&module.privates);

    for assignment in &module.concentrations {
        let value = parse_count(&assignment.value, "concentration")?;
        lowered
            .concentrations
            .insert(crn::Species::new(assignment.species.into_inner()), value);
    }
    for reaction in &module.reactions {
        lowered.reactions.push(lower_reaction(reaction)?);
    }
    lowered.compositions = lower_compositions(&module.compositions)?;

    Ok(lowered)
}

/// 按声明顺序转换源文件中的所有模块。
pub fn lower_unit<'a>(unit: &ast::Unit<'a>) -> Result<Vec<crn::Module>, CheckError<'a>> {
    unit.modules.iter().map(|module| lower_module(module)).collect()
}
