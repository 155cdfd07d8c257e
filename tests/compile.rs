use std::path::PathBuf;

use crnc::{crn::Error, options::Options, target::Script, Context};
use pretty_assertions::assert_eq;

const ADDITION: &str = "
module Addition {
    input: [x, y];
    output: z;
    reactions: {
        x -> z;
        y -> z;
    }
}
";

fn compile(source: &str) -> String {
    Context::new()
        .add_file("test.crn", source)
        .unwrap()
        .compile()
        .unwrap()
}

fn add_error(source: &str) -> anyhow::Error {
    match Context::new().add_file("test.crn", source) {
        Ok(_) => panic!("expected an error"),
        Err(e) => e,
    }
}

fn compile_error(source: &str) -> Error {
    let err = Context::new()
        .add_file("test.crn", source)
        .unwrap()
        .compile()
        .unwrap_err();
    err.downcast_ref::<Error>().cloned().unwrap()
}

#[test]
fn compile_example() {
    let source = "
module main {
    private: [x, y];
    output: z;
    concentrations: {
        x := 50;
        y := 30;
    }
    reactions: {
        x + y -> x + y + z;
        z -> 0;
    }
}
";
    assert_eq!(
        compile(source),
        "#!/usr/bin/env -S crnsimul -e -P -C z\n\
         x := 50;\n\
         y := 30;\n\
         x + y -> x + y + z;\n\
         z -> 0;\n"
    );
}

#[test]
fn only_root_is_compiled() {
    let source = "
module useless {
    private: [x, y];
    output: z;
    concentrations: { x := 1; }
    reactions: { x -> z; }
}
module main {
    private: a;
    output: b;
    concentrations: { a := 2; }
    reactions: { a -> b; }
}
";
    assert_eq!(
        compile(source),
        "#!/usr/bin/env -S crnsimul -e -P -C b\na := 2;\na -> b;\n"
    );
}

#[test]
fn composition() {
    let source = format!(
        "{ADDITION}
module main {{
    private: [a, b, c, d];
    output: e;
    concentrations: {{
        a := 50;
        b := 30;
        c := 30;
    }}
    compositions: {{
        d = Addition(a, b);
        e = Addition(d, c);
    }}
}}
"
    );
    assert_eq!(
        compile(&source),
        "#!/usr/bin/env -S crnsimul -e -P -C e\n\
         a := 50;\n\
         b := 30;\n\
         c := 30;\n\
         d -> e;\n\
         c -> e;\n\
         a -> d;\n\
         b -> d;\n"
    );
}

#[test]
fn private_species_are_scoped() {
    let source = "
module Addition {
    input: x;
    private: y;
    output: z;
    concentrations: { y := 20; }
    reactions: {
        x -> z;
        y -> z;
    }
}
module main {
    private: a;
    output: d;
    concentrations: { a := 5; }
    compositions: { d = Addition(a); }
}
";
    assert_eq!(
        compile(source),
        "#!/usr/bin/env -S crnsimul -e -P -C d\n\
         Addition_0_y := 20;\n\
         a := 5;\n\
         a -> d;\n\
         Addition_0_y -> d;\n"
    );
}

#[test]
fn repeated_instances_do_not_collide() {
    let source = "
module Source {
    private: s;
    output: z;
    concentrations: { s := 1; }
    reactions: { s -> s + z; }
}
module main {
    output: [a, b, c];
    compositions: {
        a = Source();
        scale(2) { b = Source(); c = Source(); }
        a = Source();
    }
}
";
    let script = compile(source);
    let concentrations = script
        .lines()
        .filter(|line| line.contains(":="))
        .collect::<Vec<_>>();
    assert_eq!(
        concentrations,
        [
            "Source_0_s := 1;",
            "Source_1_s := 1;",
            "Source_2_s := 1;",
            "Source_3_s := 1;",
        ]
    );
}

#[test]
fn rates_keep_their_precision() {
    let source = "
module main {
    output: [x, y, z];
    reactions: {
        x ->(2.00001) y;
        y ->(3.0) z;
        z ->(0.00000001) 2x;
    }
}
";
    assert_eq!(
        compile(source),
        "#!/usr/bin/env -S crnsimul -e -P -C x,y,z\n\
         x ->(2.00001) y;\n\
         y ->(3) z;\n\
         z ->(0.00000001) 2x;\n"
    );
}

#[test]
fn scale_block() {
    let source = format!(
        "{ADDITION}
module main {{
    private: [a, b, c, d];
    output: e;
    compositions: {{
        scale(10) {{
            d = Addition(a, b);
            e = Addition(d, c);
        }}
    }}
}}
"
    );
    assert_eq!(
        compile(&source),
        "#!/usr/bin/env -S crnsimul -e -P -C e\n\
         d ->(10) e;\n\
         c ->(10) e;\n\
         a ->(10) d;\n\
         b ->(10) d;\n"
    );
}

#[test]
fn nested_scales_match_combined_factor() {
    let module = |compositions: &str| {
        format!(
            "module Decay {{ input: x; output: y; reactions: {{ x ->(0.3) y; 2x -> 0; }} }}
             module main {{ private: a; output: b; compositions: {{ {compositions} }} }}"
        )
    };
    let nested = compile(&module("scale(0.5) { scale(4) { b = Decay(a); } }"));
    let combined = compile(&module("scale(2) { b = Decay(a); }"));
    assert_eq!(nested, combined);
    assert!(combined.contains("a ->(0.6) b;\n"));
    assert!(combined.contains("2a ->(2) 0;\n"));
}

#[test]
fn wrong_arity() {
    let source = format!(
        "{ADDITION}
module main {{
    private: [a, d];
    compositions: {{ d = Addition(a); }}
}}
"
    );
    assert!(matches!(
        compile_error(&source),
        Error::Composition(message) if message.starts_with("wrong arity")
    ));
}

#[test]
fn compile_is_deterministic() {
    let source = format!(
        "{ADDITION}
module Pair {{
    input: x;
    private: [p, q];
    output: z;
    concentrations: {{ q := 3; p := 4; }}
    reactions: {{ x + p -> q; }}
    compositions: {{ z = Addition(p, q); }}
}}
module main {{
    private: [a, b, c];
    output: d;
    concentrations: {{ a := 1; }}
    compositions: {{ b = Pair(a); c = Pair(b); d = Pair(c); }}
}}
"
    );
    let first = compile(&source);
    let second = compile(&source);
    assert_eq!(first, second);

    let concentrations = first
        .lines()
        .filter(|line| line.contains(":="))
        .collect::<Vec<_>>();
    let mut sorted = concentrations.clone();
    sorted.sort();
    assert_eq!(concentrations, sorted);
    assert_eq!(concentrations.len(), 7);
}

#[test]
fn no_main_module() {
    let source = "module notmain { private: x; reactions: { x -> 0; } }";
    assert_eq!(
        compile_error(source),
        Error::NoMainModule("main".to_string())
    );
}

#[test]
fn custom_root() {
    let context = Context::new()
        .set_options(Options {
            root: "notmain".to_string(),
            header: false,
        })
        .add_file("test.crn", "module notmain { private: x; reactions: { x -> 0; } }")
        .unwrap();
    assert_eq!(context.compile().unwrap(), "x -> 0;\n");
}

#[test]
fn duplicate_modules() {
    let source = format!("{ADDITION}{ADDITION}");
    assert_eq!(
        add_error(&source).downcast_ref::<Error>(),
        Some(&Error::MultipleModulesWithSameName("Addition".to_string()))
    );
}

#[test]
fn undeclared_species() {
    let source = "module main { private: x; reactions: { x -> y; } }";
    assert_eq!(
        add_error(source).downcast_ref::<Error>(),
        Some(&Error::SpecieNotDeclared {
            species: "y".to_string(),
            module: "main".to_string(),
        })
    );
}

#[test]
fn input_concentration() {
    let source = "module main { input: x; concentrations: { x := 1; } }";
    assert_eq!(
        add_error(source).downcast_ref::<Error>(),
        Some(&Error::InputSpecieConc {
            species: "x".to_string(),
            module: "main".to_string(),
        })
    );
}

#[test]
fn function_reactions() {
    let good = "function Catalyst { input: x; output: y; reactions: { x -> x + y; } }";
    assert!(Context::new().add_file("test.crn", good).is_ok());

    let bad = "function Consume { input: x; output: y; reactions: { x -> y; } }";
    assert_eq!(
        add_error(bad).downcast_ref::<Error>(),
        Some(&Error::FunctionIncorrectReactions("Consume".to_string()))
    );
}

#[test]
fn module_defined_below() {
    let source = format!(
        "module main {{ private: [a, b, d]; compositions: {{ d = Addition(a, b); }} }}
         {ADDITION}"
    );
    assert_eq!(
        compile_error(&source),
        Error::NoSuchModule("Addition".to_string())
    );
}

#[test]
fn submodule_sets_caller_input() {
    let source = "
module Seed { output: z; concentrations: { z := 1; } }
module main { input: i; compositions: { i = Seed(); } }
";
    assert_eq!(
        compile_error(source),
        Error::MapConcForSubModule {
            species: "i".to_string(),
            from: "Seed".to_string(),
            to: "main".to_string(),
        }
    );
}

#[test]
fn inlined_private_cannot_reuse_caller_species() {
    let source = "
module Addition {
    private: y;
    output: z;
    concentrations: { y := 20; }
    reactions: { y -> z; }
}
module main {
    private: [Addition_0_y];
    output: d;
    concentrations: { Addition_0_y := 1; }
    reactions: { Addition_0_y -> 0; }
    compositions: { d = Addition(); }
}
";
    assert_eq!(
        compile_error(source),
        Error::SpecieRedeclared {
            species: "Addition_0_y".to_string(),
            module: "main".to_string(),
        }
    );
}

#[test]
fn syntax_and_check_errors_are_rendered() {
    let err = add_error("module main {\n  output z;\n}").to_string();
    assert!(err.contains("syntax error"));
    assert!(err.contains("test.crn"));

    let err = add_error("module main {\n  input: a;\n  output: a;\n}").to_string();
    assert!(err.contains("species `a` appears more than once in module `main`"));
    assert!(err.contains("duplicated here"));
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("crnc-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("lib")).unwrap();
        Self(dir)
    }

    fn write(&self, path: &str, content: &str) -> PathBuf {
        let path = self.0.join(path);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn imports_are_resolved_relative_to_the_file() {
    let dir = TempDir::new("imports");
    dir.write("lib/addition.crn", ADDITION);
    dir.write(
        "lib/double.crn",
        "import \"addition.crn\";
         module Double { input: x; output: z; compositions: { z = Addition(x, x); } }",
    );
    let main = dir.write(
        "main.crn",
        "import \"lib/addition.crn\";
         import \"lib/double.crn\";
         module main { private: a; output: b; concentrations: { a := 3; } compositions: { b = Double(a); } }",
    );

    let context = Context::new().add_path(&main).unwrap();
    assert_eq!(context.registry().len(), 3);
    assert_eq!(
        context.compile().unwrap(),
        "#!/usr/bin/env -S crnsimul -e -P -C b\na := 3;\na -> b;\na -> b;\n"
    );
}

#[test]
fn entry_file_is_not_loaded_twice() {
    let dir = TempDir::new("cycle");
    dir.write("lib.crn", &format!("import \"main.crn\";\n{ADDITION}"));
    let source = "import \"lib.crn\";
module main { private: [a, b]; output: c; compositions: { c = Addition(a, b); } }";
    let main = dir.write("main.crn", source);

    let context = Context::new()
        .add_file(&main.to_string_lossy(), source)
        .unwrap();
    assert_eq!(context.registry().len(), 2);
    assert_eq!(
        context.compile().unwrap(),
        "#!/usr/bin/env -S crnsimul -e -P -C c\na -> c;\nb -> c;\n"
    );
}

#[test]
fn output_file() {
    let dir = TempDir::new("output");
    let main = dir.write("main.crn", "module main { output: x; reactions: { 0 -> x; } }");
    let out = dir.0.join("main.out");

    Context::new()
        .add_path(&main)
        .unwrap()
        .output_file::<Script>(&out)
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(out).unwrap(),
        "#!/usr/bin/env -S crnsimul -e -P -C x\n0 -> x;\n"
    );
}

#[test]
fn missing_import() {
    let dir = TempDir::new("missing");
    let main = dir.write("main.crn", "import \"nowhere.crn\";\nmodule main { }");
    match Context::new().add_path(&main) {
        Ok(_) => panic!("expected an error"),
        Err(e) => assert!(e.to_string().contains("nowhere.crn")),
    }
}
