#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::go_tree::{generator, GoTree};
use structgen::error::{EmitError, FileError};

const PERSON: &str = r#"package model

// Person is a person.
// @RequiredArgsConstructor
// @Getter
type Person struct {
	Name string
	Age  int `validate:"required"`
}
"#;

const ACCOUNT: &str = r#"package model

// @Builder
// @Equals
type Account struct {
	Email string `builder:"must"`
	Owner *User  `builder:"must"`
	Note  string
}

type User struct {
	ID string
}
"#;

#[test]
fn test_person_required_args_and_getters() {
    let tree = GoTree::new();
    tree.write("person.go", PERSON);

    let summary = generator(&[]).run(tree.root()).unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.written, vec![tree.path("person_generated.go")]);

    let out = tree.read("person_generated.go");
    assert!(out.starts_with("// Code generated by structgen. DO NOT EDIT.\n"));
    assert!(out.contains("\npackage model\n"));
    assert!(out.contains("func NewPersonWithRequiredArgs(age int) Person {"));
    assert!(out.contains("\t\tAge: age,\n"));
    assert!(!out.contains("Name: name"));
    assert_eq!(out.matches("func (p *Person) Get").count(), 2);
    assert!(out.contains("func (p *Person) GetName() string"));
    assert!(out.contains("func (p *Person) GetAge() int"));
    assert!(!out.contains("Set"));
    assert!(!out.contains("Builder"));
    assert!(!out.contains("import"));
}

#[test]
fn test_unannotated_file_produces_no_artifact() {
    let tree = GoTree::new();
    tree.write(
        "plain.go",
        "package model\n\n// Plain has no directives.\ntype Plain struct {\n\tX int\n}\n",
    );

    let summary = generator(&[]).run(tree.root()).unwrap();
    assert_eq!(summary.files_scanned, 1);
    assert!(summary.written.is_empty());
    assert!(!tree.exists("plain_generated.go"));
}

#[test]
fn test_builder_must_supply_email() {
    let tree = GoTree::new();
    tree.write("account.go", ACCOUNT);
    generator(&[]).run(tree.root()).unwrap();

    let out = tree.read("account_generated.go");
    assert!(out.contains(
        "func (ab AccountBuilder) WithEmail(email string) AccountBuilder {\n\
         \tvar zeroEmail string\n\
         \tif reflect.DeepEqual(email, zeroEmail) {\n\
         \t\tpanic(\"AccountBuilder: Email must not be empty\")\n\
         \t}\n\
         \tab.target.Email = email\n\
         \treturn ab\n\
         }"
    ));
    assert!(out.contains("if owner == nil {\n\t\tpanic(\"AccountBuilder: Owner must not be nil\")"));
    assert!(out.contains("func (a *Account) Equals(other Account) bool {"));
}

#[test]
fn test_reflect_imported_once() {
    let tree = GoTree::new();
    tree.write("account.go", ACCOUNT);
    generator(&[]).run(tree.root()).unwrap();

    let out = tree.read("account_generated.go");
    assert_eq!(out.matches("\"reflect\"").count(), 1);
    assert!(out.contains("import (\n\t\"reflect\"\n)\n"));
}

#[test]
fn test_origin_imports_are_carried() {
    let tree = GoTree::new();
    tree.write(
        "event.go",
        "package model\n\nimport (\n\tt \"time\"\n\t\"fmt\"\n)\n\n// @ToString\n// @Equals\ntype Event struct {\n\tAt t.Time\n}\n\nvar _ = fmt.Sprint\n",
    );
    generator(&[]).run(tree.root()).unwrap();

    let out = tree.read("event_generated.go");
    assert!(out.contains("import (\n\tt \"time\"\n\t\"fmt\"\n\t\"reflect\"\n)\n"));
    assert!(out.contains("func (e Event) String() string"));
}

#[test]
fn test_fragments_follow_declaration_order() {
    let tree = GoTree::new();
    tree.write(
        "two.go",
        "package model\n\n// @Setter\ntype B struct{ X int }\n\n// @NoArgsConstructor.Default\ntype A struct{ Y int }\n",
    );
    generator(&[]).run(tree.root()).unwrap();

    let out = tree.read("two_generated.go");
    let setter = out.find("func (b *B) SetX(x int)").unwrap();
    let ctor = out.find("func NewA() A {").unwrap();
    assert!(setter < ctor);
}

#[cfg(unix)]
#[test]
fn test_formatter_failure_removes_artifact() {
    let tree = GoTree::new();
    tree.write("person.go", PERSON);
    tree.write("account.go", ACCOUNT);

    let summary = generator(&["false"]).run(tree.root()).unwrap();
    assert_eq!(summary.files_scanned, 2);
    assert!(summary.written.is_empty());
    assert_eq!(summary.skipped.len(), 2);
    assert!(matches!(
        summary.skipped[0].error,
        FileError::Emit(EmitError::FormatterFailed { .. })
    ));
    assert!(!tree.exists("person_generated.go"));
    assert!(!tree.exists("account_generated.go"));
}

#[cfg(unix)]
#[test]
fn test_formatter_runs_on_artifact() {
    let tree = GoTree::new();
    tree.write("person.go", PERSON);
    // the stub formatter appends a marker so we can see it ran on the artifact
    let summary = generator(&["sh", "-c", "echo '// formatted' >> \"$0\""])
        .run(tree.root())
        .unwrap();
    assert_eq!(summary.written.len(), 1);
    assert!(tree.read("person_generated.go").ends_with("// formatted\n"));
}

#[test]
fn test_rerun_overwrites_and_ignores_own_output() {
    let tree = GoTree::new();
    tree.write("person.go", PERSON);
    let first = generator(&[]).run(tree.root()).unwrap();
    let before = tree.read("person_generated.go");
    let second = generator(&[]).run(tree.root()).unwrap();

    assert_eq!(first.files_scanned, 1);
    assert_eq!(second.files_scanned, 1);
    assert_eq!(before, tree.read("person_generated.go"));
}

#[test]
fn test_dropping_annotations_removes_old_artifact() {
    let tree = GoTree::new();
    tree.write("person.go", PERSON);
    generator(&[]).run(tree.root()).unwrap();
    assert!(tree.exists("person_generated.go"));

    tree.write(
        "person.go",
        "package model\n\n// Person is a person.\ntype Person struct {\n\tName string\n}\n",
    );
    let summary = generator(&[]).run(tree.root()).unwrap();
    assert!(summary.written.is_empty());
    assert_eq!(summary.removed, vec![tree.path("person_generated.go")]);
    assert!(!tree.exists("person_generated.go"));
}

#[test]
fn test_handwritten_file_with_artifact_name_is_kept() {
    let tree = GoTree::new();
    tree.write("person.go", "package model\n\ntype Person struct {\n\tName string\n}\n");
    tree.write(
        "person_generated.go",
        "package model\n\nfunc (p Person) Hello() string { return p.Name }\n",
    );
    let summary = generator(&[]).run(tree.root()).unwrap();
    assert!(summary.removed.is_empty());
    assert!(tree.exists("person_generated.go"));
}

#[test]
fn test_malformed_file_does_not_stop_run() {
    let tree = GoTree::new();
    tree.write("a.go", "package model\n\ntype Broken struct {\n\tX int\n");
    tree.write("person.go", PERSON);

    let summary = generator(&[]).run(tree.root()).unwrap();
    assert_eq!(summary.skipped.len(), 1);
    assert!(matches!(summary.skipped[0].error, FileError::Parse(_)));
    assert!(tree.exists("person_generated.go"));
}

#[test]
fn test_missing_root_is_fatal() {
    let tree = GoTree::new();
    let result = generator(&[]).run(&tree.path("does-not-exist"));
    assert!(result.is_err());
}
