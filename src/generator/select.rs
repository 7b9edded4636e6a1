//! Tag-driven field selection.
//!
//! Each directive kind owns one policy:
//!
//! | kind | included | excluded when |
//! |---|---|---|
//! | AllArgsConstructor | every field | `constructor` contains `ignore` |
//! | RequiredArgsConstructor | `validate` contains `required` | `constructor` contains `ignore` |
//! | NoArgsConstructor | none | |
//! | Builder | every field | `builder` contains `ignore` |
//! | Getter | every field | `getter` contains `ignore` |
//! | Setter | every field | `setter` contains `ignore` |
//! | ToString | every field | `to_string` contains `ignore` |
//! | Equals | none | |
//!
//! Builder fields whose `builder` tag contains `must` are flagged as
//! must-supply. Selection filters but never reorders.

use serde::Serialize;

use super::directive::DirectiveKind;
use super::naming::param_name;
use crate::source::Field;

/// A field as one directive sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedField {
    pub name: String,
    pub ty: String,
    /// Parameter name used by constructors, setters and builder methods
    pub param: String,
    /// The builder setter rejects nil / zero values
    pub must_supply: bool,
    /// Checked against `nil` rather than a zero value
    pub nilable: bool,
}

/// Tag key whose `ignore` value drops a field for `kind`.
fn exclusion_key(kind: DirectiveKind) -> Option<&'static str> {
    match kind {
        DirectiveKind::AllArgsConstructor | DirectiveKind::RequiredArgsConstructor => {
            Some("constructor")
        }
        DirectiveKind::Builder => Some("builder"),
        DirectiveKind::Getter => Some("getter"),
        DirectiveKind::Setter => Some("setter"),
        DirectiveKind::ToString => Some("to_string"),
        DirectiveKind::NoArgsConstructor | DirectiveKind::Equals => None,
    }
}

/// Apply the policy for `kind` to `fields`.
///
/// `reserved` lists identifiers already in scope in the generated code
/// (receivers and package names) that parameter names must avoid. Blank (`_`) fields are never
/// selected since they cannot be addressed by name.
pub fn select_fields(fields: &[Field], kind: DirectiveKind, reserved: &[&str]) -> Vec<SelectedField> {
    let Some(key) = exclusion_key(kind) else {
        return Vec::new();
    };
    fields
        .iter()
        .filter(|field| field.name != "_")
        .filter_map(|field| {
            if field.tag.contains(key, "ignore") {
                return None;
            }
            if kind == DirectiveKind::RequiredArgsConstructor
                && !field.tag.contains("validate", "required")
            {
                return None;
            }
            let must_supply = kind == DirectiveKind::Builder && field.tag.contains(key, "must");
            Some(SelectedField {
                name: field.name.clone(),
                ty: field.ty.clone(),
                param: param_name(&field.name, reserved),
                must_supply,
                nilable: field.is_nilable(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_source;

    fn fields(body: &str) -> Vec<Field> {
        let src = format!("package p\ntype T struct {{\n{body}\n}}\n");
        parse_source(&src)
            .expect("test source parses")
            .declarations
            .remove(0)
            .fields
    }

    fn names(selected: &[SelectedField]) -> Vec<&str> {
        selected.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_all_args_honours_constructor_ignore() {
        let f = fields("A int\nB string `constructor:\"ignore\"`\nC bool");
        let selected = select_fields(&f, DirectiveKind::AllArgsConstructor, &[]);
        assert_eq!(names(&selected), vec!["A", "C"]);
        assert_eq!(selected[0].param, "a");
    }

    #[test]
    fn test_required_args() {
        let f = fields(
            "Name string\n\
             Age int `validate:\"required\"`\n\
             Email string `validate:\"required,email\"`\n\
             Nick string `validate:\"required\" constructor:\"ignore\"`\n\
             Note string `json:\"required\"`",
        );
        let selected = select_fields(&f, DirectiveKind::RequiredArgsConstructor, &[]);
        assert_eq!(names(&selected), vec!["Age", "Email"]);
    }

    #[test]
    fn test_no_args_and_equals_select_nothing() {
        let f = fields("A int\nB int");
        assert!(select_fields(&f, DirectiveKind::NoArgsConstructor, &[]).is_empty());
        assert!(select_fields(&f, DirectiveKind::Equals, &[]).is_empty());
    }

    #[test]
    fn test_builder_must_and_nilable() {
        let f = fields(
            "Email string `builder:\"must\"`\n\
             Owner *User `builder:\"must\"`\n\
             Cache map[string]int `builder:\"ignore\"`\n\
             Tags []string\n\
             Slots [4]*Slot `builder:\"must\"`",
        );
        let selected = select_fields(&f, DirectiveKind::Builder, &["p", "pb"]);
        assert_eq!(names(&selected), vec!["Email", "Owner", "Tags", "Slots"]);
        assert!(selected[0].must_supply && !selected[0].nilable);
        assert!(selected[1].must_supply && selected[1].nilable);
        assert!(!selected[2].must_supply && selected[2].nilable);
        assert!(selected[3].must_supply && !selected[3].nilable);
    }

    #[test]
    fn test_must_only_applies_to_builder() {
        let f = fields("Email string `builder:\"must\"`");
        let selected = select_fields(&f, DirectiveKind::Getter, &[]);
        assert!(!selected[0].must_supply);
    }

    #[test]
    fn test_accessor_and_to_string_exclusions() {
        let f = fields(
            "A int `getter:\"ignore\"`\n\
             B int `setter:\"ignore\"`\n\
             C int `to_string:\"ignore\"`",
        );
        assert_eq!(names(&select_fields(&f, DirectiveKind::Getter, &[])), vec!["B", "C"]);
        assert_eq!(names(&select_fields(&f, DirectiveKind::Setter, &[])), vec!["A", "C"]);
        assert_eq!(names(&select_fields(&f, DirectiveKind::ToString, &[])), vec!["A", "B"]);
    }

    #[test]
    fn test_embedded_and_blank_fields() {
        let f = fields("*pkg.Base\n_ int\nName string");
        let selected = select_fields(&f, DirectiveKind::AllArgsConstructor, &[]);
        assert_eq!(names(&selected), vec!["Base", "Name"]);
        assert_eq!(selected[0].ty, "*pkg.Base");
        assert_eq!(selected[0].param, "base");
    }

    #[test]
    fn test_params_avoid_reserved_package_names() {
        let f = fields("Time time.Time\nName string");
        let selected = select_fields(&f, DirectiveKind::Setter, &["p", "pb", "time"]);
        assert_eq!(selected[0].param, "time_");
        assert_eq!(selected[1].param, "name");
    }
}
