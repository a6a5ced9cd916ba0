use std::path::Path;

use glob::glob;

use tsol::sink::VecSink;
use tsol::{
    compile_path, compile_source, CodegenError, CodegenOptions, CompileError, LoadError, TsolError,
};

fn demo_files() -> Vec<String> {
    glob("demos/*.ts")
        .expect("invalid glob pattern")
        .filter_map(Result::ok)
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

fn compile_demo(name: &str) -> VecSink {
    let mut sink = VecSink::default();
    compile_path(
        Path::new("demos").join(name).as_path(),
        &CodegenOptions::default(),
        &mut sink,
    )
    .unwrap_or_else(|e| panic!("{name}: {e}"));
    sink
}

fn compile_text(source: &str) -> Result<VecSink, TsolError> {
    let mut sink = VecSink::default();
    compile_source("test.ts", source, &CodegenOptions::default(), &mut sink)?;
    Ok(sink)
}

#[test]
fn every_demo_compiles() {
    let files = demo_files();
    assert!(files.len() >= 3, "demos not found: {files:?}");
    for path in files {
        let mut sink = VecSink::default();
        compile_path(Path::new(&path), &CodegenOptions::default(), &mut sink)
            .unwrap_or_else(|e| panic!("{path}: {e}"));
    }
}

#[test]
fn declaration_module_yields_no_contracts() {
    assert!(compile_demo("eth.ts").contracts.is_empty());
}

#[test]
fn bank_demo_renders_expected_contract() {
    let sink = compile_demo("bank.ts");
    assert_eq!(sink.contracts.len(), 1);
    let expected = [
        "contract Bank {",
        "   mapping(address => uint256) balances;",
        "   address owner;",
        "   constructor() public {",
        "      super();",
        "      this.owner = this.sender;",
        "   }",
        "   function balance() public returns (uint256) {",
        "      return this.balances[this.sender];",
        "   }",
        "   ",
        "   function deposit() public returns (uint256) {",
        "      uint256 balance = this.balances[this.sender];",
        "      uint256 updated = balance + this.transactionAmountWei;",
        "      assert(updated >= balance);",
        "      this.balances[this.sender] = updated;",
        "      emit (this.sender, this.transactionAmountWei);",
        "      return updated;",
        "   }",
        "   ",
        "   function withdraw(uint256 amount) public returns (uint256) {",
        "      var balance = this.balances[this.sender];",
        "      if (amount <= balance) {",
        "         this.balances[this.sender] -= amount;",
        "         msg.sender.transfer(amount);",
        "      }",
        "      else {",
        "      assert(false);",
        "      }",
        "      return this.balances[this.sender];",
        "   }",
        "   ",
        "}",
    ];
    assert_eq!(sink.contracts[0].lines, expected);
}

#[test]
fn registry_demo_uses_aliased_receiver() {
    let sink = compile_demo("registry.ts");
    let names: Vec<_> = sink.contracts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Registry", "Counter"]);

    let registry = &sink.contracts[0].lines;
    assert!(registry.contains(&"   mapping(address => string) names;".to_string()));
    assert!(registry.contains(&"   int256 count = 0;".to_string()));
    assert!(registry.contains(&"   function register(string name) public {".to_string()));
    assert!(registry.contains(&"      assert(name != \"\");".to_string()));

    let counter = &sink.contracts[1].lines;
    assert!(counter.contains(&"      while (this.value < limit) {".to_string()));
    assert!(counter.contains(&"         this.value = this.value + 1;".to_string()));
}

#[test]
fn rendering_is_stable() {
    let first = compile_demo("bank.ts");
    let second = compile_demo("bank.ts");
    assert_eq!(first.contracts, second.contracts);
}

#[test]
fn visibility_follows_private_marker() {
    let sink = compile_text(
        "class A { #secret(a: number, b: string): void { return; } open(b: string, a: number): void { return; } }",
    )
    .unwrap();
    let lines = &sink.contracts[0].lines;
    assert_eq!(lines[1], "   function secret(int256 a, string b) private {");
    assert_eq!(lines[5], "   function open(string b, int256 a) public {");
}

#[test]
fn locals_use_declared_or_untyped_form() {
    let sink = compile_text("class A { f(): void { let x = 5; let y: number = 5; } }").unwrap();
    let lines = &sink.contracts[0].lines;
    assert_eq!(lines[2], "      var x = 5;");
    assert_eq!(lines[3], "      int256 y = 5;");
}

#[test]
fn missing_type_stops_the_run() {
    let mut sink = VecSink::default();
    let err = compile_source(
        "test.ts",
        "class A { n: number; } class B { bad; } class C { m: number; }",
        &CodegenOptions::default(),
        &mut sink,
    )
    .unwrap_err();
    match err {
        TsolError::Compile(CompileError::Codegen { class, source }) => {
            assert_eq!(class, "B");
            assert!(matches!(source, CodegenError::MissingTypeAnnotation { name, .. } if name == "bad"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    let names: Vec<_> = sink.contracts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["A"]);
}

#[test]
fn unknown_intrinsic_is_rejected() {
    let err = compile_text(
        "import { ETH } from './eth'; class A { f(): void { ETH.selfdestruct(); } }",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TsolError::Compile(CompileError::Codegen {
            source: CodegenError::UnknownIntrinsic { .. },
            ..
        })
    ));
}

#[test]
fn unknown_intrinsic_inside_unsupported_expression_is_rejected() {
    let err = compile_text("class A { f(): void { if (!ETH.bogus()) { return; } } }").unwrap_err();
    assert!(matches!(
        err,
        TsolError::Compile(CompileError::Codegen {
            source: CodegenError::UnknownIntrinsic { ref member, .. },
            ..
        }) if member == "bogus"
    ));
}

#[test]
fn line_breaks_separate_statements() {
    let sink = compile_text(
        "class A {\n  total: number = 0\n  add(n: number): number {\n    this.total = this.total + n\n    return this.total\n  }\n}\n",
    )
    .unwrap();
    assert_eq!(
        sink.contracts[0].lines,
        [
            "contract A {",
            "   int256 total = 0;",
            "   function add(int256 n) public returns (int256) {",
            "      this.total = this.total + n;",
            "      return this.total;",
            "   }",
            "   ",
            "}",
        ]
    );
}

#[test]
fn missing_semicolon_between_expressions_is_a_parse_error() {
    let err = compile_text("class A { f(): void { y = a b; } }").unwrap_err();
    match err {
        TsolError::Load(LoadError::Parse { errors, .. }) => {
            assert_eq!(errors[0].message, "expected `;` after statement");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn string_escapes_are_decoded() {
    let sink = compile_text(r#"class A { name: string = "café \x41\u{21}"; }"#).unwrap();
    assert_eq!(sink.contracts[0].lines[1], "   string name = \"café A!\";");
}
