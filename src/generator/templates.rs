use askama::Template;

use super::directive::{Directive, DirectiveKind};
use super::naming::TypeShape;
use super::select::SelectedField;
use crate::error::RenderError;

/// Template data for the three constructor kinds
#[derive(Template)]
#[template(path = "constructor.go.txt", escape = "none")]
pub struct ConstructorTemplate<'a> {
    pub func_name: String,
    pub summary: &'static str,
    pub name: &'a str,
    pub type_ref: &'a str,
    pub type_params: &'a str,
    pub fields: &'a [SelectedField],
}

/// Template data for a builder type and its methods
#[derive(Template)]
#[template(path = "builder.go.txt", escape = "none")]
pub struct BuilderTemplate<'a> {
    pub name: &'a str,
    pub type_ref: &'a str,
    pub type_params: &'a str,
    pub builder_name: &'a str,
    pub builder_ref: &'a str,
    pub builder_receiver: &'a str,
    pub fields: &'a [SelectedField],
}

/// Template data for `Get<Field>` accessors
#[derive(Template)]
#[template(path = "getter.go.txt", escape = "none")]
pub struct GetterTemplate<'a> {
    pub receiver: &'a str,
    pub type_ref: &'a str,
    pub fields: &'a [SelectedField],
}

/// Template data for `Set<Field>` mutators
#[derive(Template)]
#[template(path = "setter.go.txt", escape = "none")]
pub struct SetterTemplate<'a> {
    pub receiver: &'a str,
    pub type_ref: &'a str,
    pub fields: &'a [SelectedField],
}

/// Template data for the `String()` method
#[derive(Template)]
#[template(path = "to_string.go.txt", escape = "none")]
pub struct ToStringTemplate<'a> {
    pub name: &'a str,
    pub receiver: &'a str,
    pub type_ref: &'a str,
    pub fields: &'a [SelectedField],
}

/// Template data for the `Equals` method
#[derive(Template)]
#[template(path = "equals.go.txt", escape = "none")]
pub struct EqualsTemplate<'a> {
    pub receiver: &'a str,
    pub type_ref: &'a str,
}

/// Template data for a whole generated file
#[derive(Template)]
#[template(path = "artifact.go.txt", escape = "none")]
pub struct ArtifactTemplate<'a> {
    /// File name of the origin source
    pub origin: &'a str,
    pub package: &'a str,
    /// Rendered import lines (`alias "path"` or `"path"`)
    pub imports: Vec<String>,
    pub fragments: &'a [String],
}

/// Everything a render function gets to see.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub shape: &'a TypeShape,
    pub directive: Directive,
    pub fields: &'a [SelectedField],
}

/// Pure render function for one directive kind.
pub type RenderFn = fn(&RenderInput<'_>) -> askama::Result<String>;

/// The kind → render function table.
pub fn renderer(kind: DirectiveKind) -> RenderFn {
    match kind {
        DirectiveKind::AllArgsConstructor
        | DirectiveKind::RequiredArgsConstructor
        | DirectiveKind::NoArgsConstructor => render_constructor,
        DirectiveKind::Builder => render_builder,
        DirectiveKind::ToString => render_to_string,
        DirectiveKind::Equals => render_equals,
        DirectiveKind::Getter => render_getter,
        DirectiveKind::Setter => render_setter,
    }
}

/// Render one directive of one declaration into a Go fragment.
///
/// The fragment carries no leading or trailing blank lines; the artifact
/// template separates fragments.
pub fn render_directive(input: &RenderInput<'_>) -> Result<String, RenderError> {
    let render = renderer(input.directive.kind);
    render(input)
        .map(|text| text.trim_matches('\n').to_string())
        .map_err(|source| RenderError {
            declaration: input.shape.name.clone(),
            directive: input.directive.kind,
            source,
        })
}

/// Name of the constructor function generated for `directive`.
pub fn constructor_name(type_name: &str, directive: Directive) -> String {
    if directive.default_naming {
        return format!("New{type_name}");
    }
    let suffix = match directive.kind {
        DirectiveKind::AllArgsConstructor => "WithAllArgs",
        DirectiveKind::RequiredArgsConstructor => "WithRequiredArgs",
        _ => "WithNoArgs",
    };
    format!("New{type_name}{suffix}")
}

fn render_constructor(input: &RenderInput<'_>) -> askama::Result<String> {
    let summary = match input.directive.kind {
        DirectiveKind::AllArgsConstructor => "all of its fields",
        DirectiveKind::RequiredArgsConstructor => "its required fields",
        _ => "no arguments",
    };
    ConstructorTemplate {
        func_name: constructor_name(&input.shape.name, input.directive),
        summary,
        name: &input.shape.name,
        type_ref: &input.shape.type_ref,
        type_params: &input.shape.type_params,
        fields: input.fields,
    }
    .render()
}

fn render_builder(input: &RenderInput<'_>) -> askama::Result<String> {
    BuilderTemplate {
        name: &input.shape.name,
        type_ref: &input.shape.type_ref,
        type_params: &input.shape.type_params,
        builder_name: &input.shape.builder_name,
        builder_ref: &input.shape.builder_ref,
        builder_receiver: &input.shape.builder_receiver,
        fields: input.fields,
    }
    .render()
}

fn render_getter(input: &RenderInput<'_>) -> askama::Result<String> {
    GetterTemplate {
        receiver: &input.shape.receiver,
        type_ref: &input.shape.type_ref,
        fields: input.fields,
    }
    .render()
}

fn render_setter(input: &RenderInput<'_>) -> askama::Result<String> {
    SetterTemplate {
        receiver: &input.shape.receiver,
        type_ref: &input.shape.type_ref,
        fields: input.fields,
    }
    .render()
}

fn render_to_string(input: &RenderInput<'_>) -> askama::Result<String> {
    ToStringTemplate {
        name: &input.shape.name,
        receiver: &input.shape.receiver,
        type_ref: &input.shape.type_ref,
        fields: input.fields,
    }
    .render()
}

fn render_equals(input: &RenderInput<'_>) -> askama::Result<String> {
    EqualsTemplate {
        receiver: &input.shape.receiver,
        type_ref: &input.shape.type_ref,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::imports::ImportSet;
    use crate::generator::select::select_fields;
    use crate::source::parse_source;

    fn render(src: &str, directive: Directive) -> String {
        let file = parse_source(src).expect("test source parses");
        let decl = &file.declarations[0];
        let shape = TypeShape::of(decl);
        let imports = ImportSet::from_source(&file);
        let fields = select_fields(&decl.fields, directive.kind, &shape.reserved(decl, &imports));
        render_directive(&RenderInput {
            shape: &shape,
            directive,
            fields: &fields,
        })
        .expect("template renders")
    }

    const PERSON: &str = "package p\ntype Person struct {\n\tName string\n\tAge int `validate:\"required\"`\n}\n";

    #[test]
    fn test_all_args_constructor() {
        let out = render(PERSON, Directive::new(DirectiveKind::AllArgsConstructor));
        assert!(out.contains("func NewPersonWithAllArgs(name string, age int) Person {"));
        assert!(out.contains("\t\tName: name,\n\t\tAge: age,\n"));
        assert!(out.starts_with("// NewPersonWithAllArgs"));
    }

    #[test]
    fn test_required_args_default_naming() {
        let out = render(
            PERSON,
            Directive::with_default_naming(DirectiveKind::RequiredArgsConstructor),
        );
        assert!(out.contains("func NewPerson(age int) Person {"));
        assert!(!out.contains("Name: name"));
    }

    #[test]
    fn test_no_args_constructor() {
        let out = render(PERSON, Directive::new(DirectiveKind::NoArgsConstructor));
        assert!(out.contains("func NewPersonWithNoArgs() Person {"));
        assert!(out.contains("return Person{\n\t}"));
    }

    #[test]
    fn test_builder_must_supply_checks() {
        let src = "package p\ntype Account struct {\n\tEmail string `builder:\"must\"`\n\tOwner *User `builder:\"must\"`\n\tNote string\n}\n";
        let out = render(src, Directive::new(DirectiveKind::Builder));
        assert!(out.contains("type AccountBuilder struct {\n\ttarget *Account\n}"));
        assert!(out.contains(
            "func (ab AccountBuilder) WithEmail(email string) AccountBuilder {\n\
             \tvar zeroEmail string\n\
             \tif reflect.DeepEqual(email, zeroEmail) {\n\
             \t\tpanic(\"AccountBuilder: Email must not be empty\")\n\
             \t}\n\
             \tab.target.Email = email\n\
             \treturn ab\n}"
        ));
        assert!(out.contains("\tif owner == nil {\n\t\tpanic(\"AccountBuilder: Owner must not be nil\")\n\t}"));
        assert!(out.contains(
            "func (ab AccountBuilder) WithNote(note string) AccountBuilder {\n\tab.target.Note = note\n"
        ));
        assert!(out.contains("func (ab AccountBuilder) Build() Account {\n\treturn *ab.target\n}"));
        assert!(out.contains("return AccountBuilder{target: &Account{}}"));
    }

    #[test]
    fn test_builder_params_do_not_shadow_packages() {
        let src = "package p\nimport (\n\t\"context\"\n\t\"time\"\n)\ntype Event struct {\n\tTime time.Time `builder:\"must\"`\n\tContext context.Context\n}\n";
        let out = render(src, Directive::new(DirectiveKind::Builder));
        assert!(out.contains(
            "func (eb EventBuilder) WithTime(time_ time.Time) EventBuilder {\n\
             \tvar zeroTime time.Time\n\
             \tif reflect.DeepEqual(time_, zeroTime) {"
        ));
        assert!(out.contains("\teb.target.Time = time_\n"));
        assert!(out.contains("WithContext(context_ context.Context) EventBuilder {"));
    }

    #[test]
    fn test_must_supply_array_of_pointers_uses_zero_check() {
        let src = "package p\ntype Grid struct {\n\tCells [4]*Cell `builder:\"must\"`\n}\n";
        let out = render(src, Directive::new(DirectiveKind::Builder));
        assert!(out.contains("\tvar zeroCells [4]*Cell\n"));
        assert!(!out.contains("== nil"));
    }

    #[test]
    fn test_getter_and_setter() {
        let getters = render(PERSON, Directive::new(DirectiveKind::Getter));
        assert!(getters.contains("func (p *Person) GetName() string {\n\treturn p.Name\n}"));
        assert!(getters.contains("func (p *Person) GetAge() int {\n\treturn p.Age\n}"));

        let setters = render(PERSON, Directive::new(DirectiveKind::Setter));
        assert!(setters.contains("func (p *Person) SetAge(age int) {\n\tp.Age = age\n}"));
        assert!(!setters.contains("Get"));
    }

    #[test]
    fn test_to_string() {
        let src = "package p\ntype Person struct {\n\tName string\n\tSecret string `to_string:\"ignore\"`\n\tAge int\n}\n";
        let out = render(src, Directive::new(DirectiveKind::ToString));
        assert!(out.contains("func (p Person) String() string {"));
        assert!(out.contains(
            "return fmt.Sprintf(\"Person{ Name: %v, Age: %v }\", p.Name, p.Age)"
        ));
    }

    #[test]
    fn test_to_string_without_fields() {
        let out = render(
            "package p\ntype Empty struct{}\n",
            Directive::new(DirectiveKind::ToString),
        );
        assert!(out.contains("return fmt.Sprint(\"Empty{}\")"));
    }

    #[test]
    fn test_equals_compares_whole_value() {
        let out = render(PERSON, Directive::new(DirectiveKind::Equals));
        assert!(out.contains("func (p *Person) Equals(other Person) bool {"));
        assert!(out.contains("return reflect.DeepEqual(*p, other)"));
    }

    #[test]
    fn test_generic_declaration() {
        let src = "package p\ntype Pair[K comparable, V any] struct {\n\tKey K\n\tValue V\n}\n";
        let ctor = render(src, Directive::new(DirectiveKind::AllArgsConstructor));
        assert!(ctor.contains(
            "func NewPairWithAllArgs[K comparable, V any](key K, value V) Pair[K, V] {"
        ));
        let builder = render(src, Directive::new(DirectiveKind::Builder));
        assert!(builder.contains("type PairBuilder[K comparable, V any] struct {"));
        assert!(builder.contains("func NewPairBuilder[K comparable, V any]() PairBuilder[K, V] {"));
        let getter = render(src, Directive::new(DirectiveKind::Getter));
        assert!(getter.contains("func (p *Pair[K, V]) GetKey() K {"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = render(PERSON, Directive::new(DirectiveKind::Builder));
        let second = render(PERSON, Directive::new(DirectiveKind::Builder));
        assert_eq!(first, second);
    }
}
