//! 语法解析器。

use crate::{
    frontend::ast,
    utils::{error_snippet, Span},
};
use pest::{iterators::Pair, Parser};

mod grammar {
    #[derive(Parser)]
    #[grammar = "frontend/crn.pest"]
    pub struct CrnParser;
}

use grammar::{CrnParser, Rule};

/// 从文本生成抽象语法树。语法错误以渲染好的错误信息返回。
pub fn parse<'a>(source: &'a str, filename: &'a str) -> Result<Span<'a, ast::Unit<'a>>, String> {
    let mut parsed = CrnParser::parse(Rule::Program, source).map_err(|err| {
        let (start, end) = match err.location {
            pest::error::InputLocation::Pos(pos) => (pos, pos),
            pest::error::InputLocation::Span(span) => span,
        };
        let span = Span::new((), filename, source, start, end);
        error_snippet("syntax error", &span, &err.variant.message(), None)
    })?;

    Ok(UnitParser { filename, source }.parse_unit(parsed.next().unwrap()))
}

#[derive(Copy, Clone)]
struct UnitParser<'a> {
    filename: &'a str,
    source: &'a str,
}

impl<'a> UnitParser<'a> {
    fn span<T>(self, inner: T, pair: &Pair<'a, Rule>) -> Span<'a, T> {
        Span::from_pest(inner, self.filename, self.source, pair.as_span())
    }

    fn parse_unit(self, program: Pair<'a, Rule>) -> Span<'a, ast::Unit<'a>> {
        let span = program.as_span();

        let mut imports = vec![];
        let mut modules = vec![];

        for pair in program.into_inner() {
            match pair.as_rule() {
                Rule::Import => imports.push(self.parse_import(pair)),
                Rule::Module => modules.push(self.parse_module(pair)),
                Rule::EOI => {}
                _ => unreachable!(),
            }
        }

        let unit = ast::Unit { imports, modules };
        Span::from_pest(unit, self.filename, self.source, span)
    }

    fn parse_import(self, import: Pair<'a, Rule>) -> Span<'a, &'a str> {
        let path = import.into_inner().next().unwrap();
        let inner = path.into_inner().next().unwrap();
        self.parse_ident(inner)
    }

    fn parse_module(self, module: Pair<'a, Rule>) -> Span<'a, ast::Module<'a>> {
        let span = module.as_span();
        let mut pairs = module.into_inner();

        let kind = match pairs.next().unwrap().as_str() {
            "function" => ast::ModuleKind::Function,
            _ => ast::ModuleKind::Module,
        };
        let name = self.parse_ident(pairs.next().unwrap());

        let mut module = ast::Module {
            kind,
            name,
            inputs: vec![],
            outputs: vec![],
            privates: vec![],
            concentrations: vec![],
            reactions: vec![],
            compositions: vec![],
        };

        for section in pairs {
            match section.as_rule() {
                Rule::Inputs => module.inputs.extend(self.parse_idents(section)),
                Rule::Outputs => module.outputs.extend(self.parse_idents(section)),
                Rule::Privates => module.privates.extend(self.parse_idents(section)),
                Rule::Concentrations => module.concentrations.extend(
                    section.into_inner().map(|pair| self.parse_assignment(pair)),
                ),
                Rule::Reactions => module
                    .reactions
                    .extend(section.into_inner().map(|pair| self.parse_reaction(pair))),
                Rule::Compositions => module
                    .compositions
                    .extend(section.into_inner().map(|pair| self.parse_composition(pair))),
                _ => unreachable!(),
            }
        }

        Span::from_pest(module, self.filename, self.source, span)
    }

    fn parse_assignment(self, assignment: Pair<'a, Rule>) -> Span<'a, ast::Assignment<'a>> {
        let span = assignment.as_span();
        let mut pairs = assignment.into_inner();
        let species = self.parse_ident(pairs.next().unwrap());
        let value = self.parse_ident(pairs.next().unwrap());
        Span::from_pest(
            ast::Assignment { species, value },
            self.filename,
            self.source,
            span,
        )
    }

    fn parse_reaction(self, reaction: Pair<'a, Rule>) -> Span<'a, ast::Reaction<'a>> {
        let span = reaction.as_span();
        let mut pairs = reaction.into_inner();

        let reactants = self.parse_side(pairs.next().unwrap());
        let next = pairs.next().unwrap();
        let (rate, products) = match next.as_rule() {
            Rule::Rate => {
                let number = next.into_inner().next().unwrap();
                let products = self.parse_side(pairs.next().unwrap());
                (Some(self.parse_ident(number)), products)
            }
            Rule::Side => (None, self.parse_side(next)),
            _ => unreachable!(),
        };

        let reaction = ast::Reaction {
            reactants,
            rate,
            products,
        };
        Span::from_pest(reaction, self.filename, self.source, span)
    }

    fn parse_side(self, side: Pair<'a, Rule>) -> Vec<ast::Term<'a>> {
        side.into_inner()
            .filter(|pair| pair.as_rule() == Rule::ReactionTerm)
            .map(|term| {
                let mut pairs = term.into_inner().collect::<Vec<_>>();
                let species = self.parse_ident(pairs.pop().unwrap());
                let coefficient = pairs.pop().map(|pair| self.parse_ident(pair));
                ast::Term {
                    coefficient,
                    species,
                }
            })
            .collect()
    }

    fn parse_composition(self, composition: Pair<'a, Rule>) -> Span<'a, ast::Composition<'a>> {
        let span = composition.as_span();
        let composition = match composition.as_rule() {
            Rule::Scale => {
                let mut pairs = composition.into_inner();
                let factor = self.parse_ident(pairs.next().unwrap());
                let body = pairs.map(|pair| self.parse_composition(pair)).collect();
                ast::Composition::Scale { factor, body }
            }
            Rule::Call => {
                let mut pairs = composition.into_inner().peekable();
                let results = match pairs.peek().map(|pair| pair.as_rule()) {
                    Some(Rule::Results) => self.parse_idents(pairs.next().unwrap()),
                    _ => vec![],
                };
                let callee = self.parse_ident(pairs.next().unwrap());
                let arguments = self.parse_idents(pairs.next().unwrap());
                ast::Composition::Call {
                    results,
                    callee,
                    arguments,
                }
            }
            _ => unreachable!(),
        };
        Span::from_pest(composition, self.filename, self.source, span)
    }

    fn parse_idents(self, list: Pair<'a, Rule>) -> Vec<ast::Ident<'a>> {
        list.into_inner().map(|pair| self.parse_ident(pair)).collect()
    }

    fn parse_ident(self, ident: Pair<'a, Rule>) -> ast::Ident<'a> {
        self.span(ident.as_str(), &ident)
    }
}
