//! Identifier conventions for generated Go code.

use super::imports::ImportSet;
use crate::source::{is_go_keyword, Declaration};

/// Identifiers that would shadow something the generated bodies rely on.
const PREDECLARED: &[&str] = &[
    "any", "append", "bool", "byte", "cap", "clear", "close", "comparable", "complex",
    "complex128", "complex64", "copy", "delete", "error", "false", "float32", "float64", "imag",
    "int", "int16", "int32", "int64", "int8", "iota", "len", "make", "max", "min", "new", "nil",
    "panic", "print", "println", "real", "recover", "rune", "string", "true", "uint", "uint16",
    "uint32", "uint64", "uint8", "uintptr",
    // package names used inside generated bodies
    "fmt", "reflect",
];

/// Lower the leading upper-case run of an identifier.
///
/// `Name` becomes `name`, `ID` becomes `id` and `HTTPServer` becomes
/// `httpServer`: in a run followed by a lower-case letter the last capital
/// starts the next word and is kept.
pub fn lower_camel(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let run = chars.iter().take_while(|c| c.is_uppercase()).count();
    let lower_upto = match run {
        0 => return ident.to_string(),
        1 => 1,
        n if n == chars.len() => n,
        n if chars[n].is_lowercase() => n - 1,
        n => n,
    };
    let mut out = String::with_capacity(ident.len());
    for (i, c) in chars.iter().enumerate() {
        if i < lower_upto {
            out.extend(c.to_lowercase());
        } else {
            out.push(*c);
        }
    }
    out
}

/// Receiver for methods on a type: its first letter, lower-cased.
pub fn receiver_name(type_name: &str) -> String {
    type_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_else(|| "x".to_string())
}

/// Parameter name for a field, escaped away from keywords, predeclared
/// identifiers and the `reserved` names in scope.
pub fn param_name(field_name: &str, reserved: &[&str]) -> String {
    let mut name = lower_camel(field_name);
    while is_go_keyword(&name)
        || PREDECLARED.contains(&name.as_str())
        || reserved.contains(&name.as_str())
    {
        name.push('_');
    }
    name
}

/// Names derived once per declaration and shared by every template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    /// Bare type name (`Pair`)
    pub name: String,
    /// Type as referenced in signatures (`Pair[K, V]`)
    pub type_ref: String,
    /// Parameter list for declarations (`[K comparable, V any]`), or empty
    pub type_params: String,
    /// Method receiver (`p`)
    pub receiver: String,
    /// Builder type name (`PairBuilder`)
    pub builder_name: String,
    /// Builder type as referenced (`PairBuilder[K, V]`)
    pub builder_ref: String,
    /// Builder method receiver (`pb`)
    pub builder_receiver: String,
}

impl TypeShape {
    pub fn of(decl: &Declaration) -> Self {
        let receiver = receiver_name(&decl.name);
        let builder_name = format!("{}Builder", decl.name);
        let args = type_args(&decl.type_params);
        let (type_params, type_args) = if args.is_empty() {
            (String::new(), String::new())
        } else {
            (
                format!("[{}]", decl.type_params),
                format!("[{}]", args.join(", ")),
            )
        };
        TypeShape {
            type_ref: format!("{}{}", decl.name, type_args),
            builder_ref: format!("{builder_name}{type_args}"),
            builder_receiver: format!("{receiver}b"),
            name: decl.name.clone(),
            type_params,
            receiver,
            builder_name,
        }
    }

    /// Names a field parameter of `decl` must not take: the receivers, every
    /// package `imports` binds and every package qualifier in a field type.
    ///
    /// A parameter named after a package shadows it, so `time time.Time`
    /// breaks a body that mentions `time.Time` again.
    pub fn reserved<'a>(&'a self, decl: &'a Declaration, imports: &'a ImportSet) -> Vec<&'a str> {
        let mut names = vec![self.receiver.as_str(), self.builder_receiver.as_str()];
        let packages = imports
            .package_names()
            .chain(decl.fields.iter().flat_map(|f| type_qualifiers(&f.ty)));
        for name in packages {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Package qualifiers referenced by a type: `map[string]*time.Time` gives
/// `time`.
pub fn type_qualifiers(ty: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in ty.char_indices() {
        if c.is_alphanumeric() || c == '_' {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take() {
            let selected = ty[..s].ends_with('.');
            let ident = &ty[s..i];
            if c == '.' && !selected && !out.contains(&ident) {
                out.push(ident);
            }
        }
    }
    out
}

/// Type argument names of a parameter list: the first identifier of every
/// top-level comma-separated entry (`K comparable, V any` gives `K, V`).
fn type_args(params: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut push = |chunk: &str| {
        let ident: String = chunk
            .trim()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !ident.is_empty() {
            out.push(ident);
        }
    };
    for (i, c) in params.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push(&params[start..]);
    out
}
