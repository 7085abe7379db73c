//! AST types for TypeScript ambient declaration files.
//!
//! Every node implements [`Display`](fmt::Display), rendering it back to
//! declaration syntax. The importer embeds that text in placeholder comments
//! for constructs it cannot translate.

use std::fmt;

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub declarations: Vec<Declaration>,
    /// Recoverable problems found while parsing.
    pub warnings: Vec<ParseWarning>,
}

/// A recoverable parse problem. The parser keeps going after recording one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub message: String,
    pub pos: usize,
}

/// A top-level (or namespace-level) declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VarDecl),
    Function(FunctionDecl),
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Class(ClassDecl),
    Namespace(NamespaceDecl),
    /// A statement the grammar recognizes but does not model, kept as source text.
    Unsupported(String),
}

/// `declare var name: Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Option<Type>,
}

/// `declare function name<T>(params): Result;`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub signature: Signature,
}

/// `interface Name<T> extends Base { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<Type>,
    pub members: Vec<Member>,
}

/// `type Name<T> = Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: Type,
}

/// `declare class Name<T> extends Base implements Iface { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<Type>,
    pub implements: Vec<Type>,
    pub members: Vec<Member>,
}

/// `declare namespace a.b { declarations }`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub path: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// A generic type parameter with optional constraint and default.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<Type>,
    pub default: Option<Type>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }
}

/// Type parameters, parameters and an optional result type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub result: Option<Type>,
}

/// A function/method parameter.
///
/// A rest parameter `...xs: T[]` is stored with type `Type::Repeated(T)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub optional: bool,
    pub ty: Option<Type>,
}

/// A member of an interface, class body or object type.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// `(params): Result`
    Call(Signature),
    /// `new (params): Result`
    Construct(Signature),
    /// `[key: K]: V`
    Index { param: Param, ty: Type },
    /// `name?: Type`
    Property {
        name: String,
        optional: bool,
        ty: Option<Type>,
    },
    /// `name?<T>(params): Result`
    Method {
        name: String,
        optional: bool,
        signature: Signature,
    },
    /// A member marked `static` inside a class body.
    Static(Box<Member>),
}

/// The fixed primitive type names of the declaration language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreType {
    Any,
    Void,
    Number,
    Bool,
    Boolean,
    String,
}

impl CoreType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoreType::Any => "any",
            CoreType::Void => "void",
            CoreType::Number => "number",
            CoreType::Bool => "bool",
            CoreType::Boolean => "boolean",
            CoreType::String => "string",
        }
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Core(CoreType),
    /// A possibly qualified type reference: `Promise<T>`, `ns.Thing`
    Named { name: Vec<String>, args: Vec<Type> },
    /// An inline object type: `{ x: number }`
    Object(Vec<Member>),
    /// A function type: `<T>(a: T) => R`. The result is always present.
    Function(Box<Signature>),
    /// A constructor type: `new (a: T) => R`
    Constructor(Box<Signature>),
    /// The element type of a rest parameter.
    Repeated(Box<Type>),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
    Tuple(Vec<Type>),
    /// A literal type (`"GET"`, `42`, `true`, `null`) or `this`, as written.
    Literal(String),
    /// `typeof name`
    Query(Vec<String>),
    Parenthesized(Box<Type>),
}

impl Type {
    /// A reference to a simple, unqualified name.
    pub fn named(name: impl Into<String>, args: Vec<Type>) -> Self {
        Type::Named {
            name: vec![name.into()],
            args,
        }
    }

    /// `elem[]`, which is sugar for `Array<elem>`.
    pub fn array(elem: Type) -> Self {
        Type::named("Array", vec![elem])
    }

    /// Split off the element type if this is `Array<T>` (or `T[]`).
    pub fn into_array_element(self) -> Result<Type, Type> {
        match self {
            Type::Named { name, mut args } if is_array_name(&name) && args.len() == 1 => {
                Ok(args.remove(0))
            }
            other => Err(other),
        }
    }
}

fn is_array_name(name: &[String]) -> bool {
    name.len() == 1 && name[0] == "Array"
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_type_params(f: &mut fmt::Formatter<'_>, params: &[TypeParam]) -> fmt::Result {
    if !params.is_empty() {
        f.write_str("<")?;
        write_list(f, params, ", ")?;
        f.write_str(">")?;
    }
    Ok(())
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[Member]) -> fmt::Result {
    if members.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{ ")?;
    for member in members {
        write!(f, "{member}; ")?;
    }
    f.write_str("}")
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Core(core) => write!(f, "{core}"),
            Type::Named { name, args } => {
                if is_array_name(name) && args.len() == 1 {
                    return write!(f, "{}[]", args[0]);
                }
                f.write_str(&name.join("."))?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Object(members) => write_members(f, members),
            Type::Function(sig) => {
                write_type_params(f, &sig.type_params)?;
                f.write_str("(")?;
                write_list(f, &sig.params, ", ")?;
                f.write_str(") => ")?;
                match &sig.result {
                    Some(result) => write!(f, "{result}"),
                    None => f.write_str("any"),
                }
            }
            Type::Constructor(sig) => {
                f.write_str("new ")?;
                write!(f, "{}", Type::Function(sig.clone()))
            }
            Type::Repeated(elem) => write!(f, "{elem}[]"),
            Type::Union(types) => write_list(f, types, " | "),
            Type::Intersection(types) => write_list(f, types, " & "),
            Type::Tuple(types) => {
                f.write_str("[")?;
                write_list(f, types, ", ")?;
                f.write_str("]")
            }
            Type::Literal(text) => f.write_str(text),
            Type::Query(name) => write!(f, "typeof {}", name.join(".")),
            Type::Parenthesized(inner) => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " extends {constraint}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.ty, Some(Type::Repeated(_))) {
            f.write_str("...")?;
        }
        f.write_str(&self.name)?;
        if self.optional {
            f.write_str("?")?;
        }
        if let Some(ty) = &self.ty {
            write!(f, ": {ty}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type_params(f, &self.type_params)?;
        f.write_str("(")?;
        write_list(f, &self.params, ", ")?;
        f.write_str(")")?;
        if let Some(result) = &self.result {
            write!(f, ": {result}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Call(sig) => write!(f, "{sig}"),
            Member::Construct(sig) => write!(f, "new {sig}"),
            Member::Index { param, ty } => write!(f, "[{param}]: {ty}"),
            Member::Property { name, optional, ty } => {
                f.write_str(name)?;
                if *optional {
                    f.write_str("?")?;
                }
                if let Some(ty) = ty {
                    write!(f, ": {ty}")?;
                }
                Ok(())
            }
            Member::Method {
                name,
                optional,
                signature,
            } => {
                f.write_str(name)?;
                if *optional {
                    f.write_str("?")?;
                }
                write!(f, "{signature}")
            }
            Member::Static(member) => write!(f, "static {member}"),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Variable(var) => {
                write!(f, "var {}", var.name)?;
                if let Some(ty) = &var.ty {
                    write!(f, ": {ty}")?;
                }
                f.write_str(";")
            }
            Declaration::Function(func) => write!(f, "function {}{};", func.name, func.signature),
            Declaration::Interface(iface) => {
                write!(f, "interface {}", iface.name)?;
                write_type_params(f, &iface.type_params)?;
                if !iface.extends.is_empty() {
                    f.write_str(" extends ")?;
                    write_list(f, &iface.extends, ", ")?;
                }
                f.write_str(" ")?;
                write_members(f, &iface.members)
            }
            Declaration::TypeAlias(alias) => {
                write!(f, "type {}", alias.name)?;
                write_type_params(f, &alias.type_params)?;
                write!(f, " = {};", alias.ty)
            }
            Declaration::Class(class) => {
                write!(f, "class {}", class.name)?;
                write_type_params(f, &class.type_params)?;
                if let Some(base) = &class.extends {
                    write!(f, " extends {base}")?;
                }
                if !class.implements.is_empty() {
                    f.write_str(" implements ")?;
                    write_list(f, &class.implements, ", ")?;
                }
                f.write_str(" ")?;
                write_members(f, &class.members)
            }
            Declaration::Namespace(ns) => {
                write!(f, "namespace {} {{ ", ns.path.join("."))?;
                for decl in &ns.declarations {
                    write!(f, "{decl} ")?;
                }
                f.write_str("}")
            }
            Declaration::Unsupported(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: Type) -> Param {
        Param {
            name: name.to_string(),
            optional: false,
            ty: Some(ty),
        }
    }

    #[test]
    fn test_array_sugar() {
        let ty = Type::array(Type::Core(CoreType::String));

        assert_eq!(ty.to_string(), "string[]");
        assert_eq!(ty.into_array_element(), Ok(Type::Core(CoreType::String)));
        assert!(Type::named("Promise", vec![Type::Core(CoreType::Any)])
            .into_array_element()
            .is_err());
    }

    #[test]
    fn test_display_function_type() {
        let ty = Type::Function(Box::new(Signature {
            type_params: vec![TypeParam::new("T")],
            params: vec![
                param("a", Type::named("T", vec![])),
                param("rest", Type::Repeated(Box::new(Type::Core(CoreType::Number)))),
            ],
            result: Some(Type::Core(CoreType::Void)),
        }));

        assert_eq!(ty.to_string(), "<T>(a: T, ...rest: number[]) => void");
    }

    #[test]
    fn test_display_members() {
        let ty = Type::Object(vec![
            Member::Property {
                name: "x".to_string(),
                optional: true,
                ty: Some(Type::Core(CoreType::Number)),
            },
            Member::Index {
                param: param("key", Type::Core(CoreType::String)),
                ty: Type::Core(CoreType::Any),
            },
            Member::Construct(Signature::default()),
        ]);

        assert_eq!(ty.to_string(), "{ x?: number; [key: string]: any; new (); }");
    }

    #[test]
    fn test_display_declarations() {
        let decl = Declaration::TypeAlias(TypeAliasDecl {
            name: "Pair".to_string(),
            type_params: vec![TypeParam::new("A")],
            ty: Type::Tuple(vec![Type::named("A", vec![]), Type::named("A", vec![])]),
        });
        assert_eq!(decl.to_string(), "type Pair<A> = [A, A];");

        let decl = Declaration::Unsupported("export = foo;".to_string());
        assert_eq!(decl.to_string(), "export = foo;");
    }
}
