//! The resolved Scala.js namespace model produced by the importer.
//!
//! Containers (packages, classes, modules) own their members in declaration
//! order. A class and a module with the same name inside one container are
//! companions; each refers to the other by [`MemberId`] within that
//! container, never by ownership.

use std::fmt;

/// Scala reserved words, which must be backquoted when used as identifiers.
const SCALA_RESERVED: &[&str] = &[
    "abstract", "case", "catch", "class", "def", "do", "else", "enum", "export", "extends",
    "false", "final", "finally", "for", "forSome", "given", "if", "implicit", "import", "lazy",
    "macro", "match", "new", "null", "object", "override", "package", "private", "protected",
    "return", "sealed", "super", "then", "this", "throw", "trait", "true", "try", "type", "val",
    "var", "while", "with", "yield", "_",
];

/// An identifier. Rendering escapes it for Scala when needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Name(name.into())
    }

    /// The name given to methods generated from call signatures.
    pub fn apply() -> Self {
        Name::new("apply")
    }

    /// The name given to constructors.
    pub fn constructor() -> Self {
        Name::new("<init>")
    }

    pub fn is_constructor(&self) -> bool {
        self.0 == "<init>"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the name can be written in Scala without backquotes.
    pub fn is_plain_identifier(&self) -> bool {
        let mut chars = self.0.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_alphabetic() || first == '_' || first == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            && !SCALA_RESERVED.contains(&self.0.as_str())
    }

    /// Parse an identifier as written in Scala source, removing backquotes.
    pub fn unescape(text: &str) -> Self {
        match text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
            Some(inner) if !inner.is_empty() => Name::new(inner),
            _ => Name::new(text),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain_identifier() {
            f.write_str(&self.0)
        } else {
            // Backquoted identifiers cannot contain a backquote.
            write!(f, "`{}`", self.0.replace('`', "_"))
        }
    }
}

/// A dotted path from the root namespace. Empty means the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName(Vec<Name>);

impl QualifiedName {
    pub fn root() -> Self {
        QualifiedName(Vec::new())
    }

    pub fn from_name(name: Name) -> Self {
        QualifiedName(vec![name])
    }

    pub fn from_segments(segments: Vec<Name>) -> Self {
        QualifiedName(segments)
    }

    /// Split `a.b.c` into segments. Empty segments are ignored, so `""`
    /// yields the root.
    pub fn parse_dotted(path: &str) -> Self {
        QualifiedName(
            path.split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Name::new)
                .collect(),
        )
    }

    /// A name inside the `js` namespace of Scala.js.
    fn js(name: &str) -> Self {
        QualifiedName(vec![Name::new("js"), Name::new(name)])
    }

    pub fn dot(&self, name: Name) -> Self {
        let mut segments = self.0.clone();
        segments.push(name);
        QualifiedName(segments)
    }

    /// `(init, last)`, or `None` for the root.
    pub fn split_last(&self) -> Option<(QualifiedName, &Name)> {
        let (last, init) = self.0.split_last()?;
        Some((QualifiedName(init.to_vec()), last))
    }

    pub fn segments(&self) -> &[Name] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

const REPEATED: &str = "<repeated>";

/// A reference to a (possibly applied) Scala type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: QualifiedName,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn new(name: QualifiedName, args: Vec<TypeRef>) -> Self {
        Self { name, args }
    }

    fn plain(name: &str) -> Self {
        TypeRef::new(QualifiedName::from_name(Name::new(name)), Vec::new())
    }

    fn js(name: &str, args: Vec<TypeRef>) -> Self {
        TypeRef::new(QualifiedName::js(name), args)
    }

    pub fn any() -> Self {
        TypeRef::js("Any", Vec::new())
    }

    pub fn dynamic() -> Self {
        TypeRef::js("Dynamic", Vec::new())
    }

    pub fn object() -> Self {
        TypeRef::js("Object", Vec::new())
    }

    pub fn unit() -> Self {
        TypeRef::plain("Unit")
    }

    pub fn number() -> Self {
        TypeRef::plain("Double")
    }

    pub fn boolean() -> Self {
        TypeRef::plain("Boolean")
    }

    pub fn string() -> Self {
        TypeRef::plain("String")
    }

    pub fn array(elem: TypeRef) -> Self {
        TypeRef::js("Array", vec![elem])
    }

    /// The untyped function marker, for signatures `js.FunctionN` cannot express.
    pub fn function_base() -> Self {
        TypeRef::js("Function", Vec::new())
    }

    /// `js.FunctionN[P1, ..., PN, R]`; `args` are the parameter types followed
    /// by the result type.
    pub fn function(args: Vec<TypeRef>) -> Self {
        let arity = args.len().saturating_sub(1);
        TypeRef::js(&format!("Function{arity}"), args)
    }

    /// Mark `underlying` as a vararg type.
    pub fn repeated(underlying: TypeRef) -> Self {
        TypeRef::new(
            QualifiedName::from_name(Name::new(REPEATED)),
            vec![underlying],
        )
    }

    /// The underlying type if this is a vararg type.
    pub fn as_repeated(&self) -> Option<&TypeRef> {
        match (self.name.segments(), self.args.as_slice()) {
            ([name], [underlying]) if name.as_str() == REPEATED => Some(underlying),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(underlying) = self.as_repeated() {
            return write!(f, "{underlying}*");
        }
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            f.write_str("[")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Index of a member within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberId(usize);

/// A node in the namespace tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// Source text that could not be translated.
    Comment(String),
    Package(PackageSymbol),
    Class(ClassSymbol),
    Module(ModuleSymbol),
    Field(FieldSymbol),
    Method(MethodSymbol),
}

impl Symbol {
    pub fn name(&self) -> Option<&Name> {
        match self {
            Symbol::Comment(_) => None,
            Symbol::Package(sym) => Some(&sym.name),
            Symbol::Class(sym) => Some(&sym.name),
            Symbol::Module(sym) => Some(&sym.name),
            Symbol::Field(sym) => Some(&sym.name),
            Symbol::Method(sym) => Some(&sym.name),
        }
    }

    /// The child list, for container symbols.
    pub fn members(&self) -> Option<&Members> {
        match self {
            Symbol::Package(sym) => Some(&sym.members),
            Symbol::Class(sym) => Some(&sym.members),
            Symbol::Module(sym) => Some(&sym.members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Members> {
        match self {
            Symbol::Package(sym) => Some(&mut sym.members),
            Symbol::Class(sym) => Some(&mut sym.members),
            Symbol::Module(sym) => Some(&mut sym.members),
            _ => None,
        }
    }
}

/// The ordered, append-only child list of a container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Members {
    items: Vec<Symbol>,
    anonymous_counter: u32,
}

impl Members {
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: MemberId) -> Option<&Symbol> {
        self.items.get(id.0)
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut Symbol> {
        self.items.get_mut(id.0)
    }

    pub fn push(&mut self, symbol: Symbol) -> MemberId {
        self.items.push(symbol);
        MemberId(self.items.len() - 1)
    }

    pub fn push_comment(&mut self, text: impl Into<String>) -> MemberId {
        self.push(Symbol::Comment(text.into()))
    }

    /// A fresh name for a member that has none of its own.
    pub fn new_anonymous_name(&mut self) -> Name {
        self.anonymous_counter += 1;
        Name::new(format!("anonymous${}", self.anonymous_counter))
    }

    fn position(&self, pred: impl Fn(&Symbol) -> bool) -> Option<MemberId> {
        self.items.iter().position(pred).map(MemberId)
    }

    pub fn find_package(&self, name: &Name) -> Option<MemberId> {
        self.position(|s| matches!(s, Symbol::Package(p) if &p.name == name))
    }

    pub fn find_class(&self, name: &Name) -> Option<MemberId> {
        self.position(|s| matches!(s, Symbol::Class(c) if &c.name == name))
    }

    pub fn find_module(&self, name: &Name) -> Option<MemberId> {
        self.position(|s| matches!(s, Symbol::Module(m) if &m.name == name))
    }

    pub fn class(&self, id: MemberId) -> Option<&ClassSymbol> {
        match self.get(id) {
            Some(Symbol::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn class_mut(&mut self, id: MemberId) -> Option<&mut ClassSymbol> {
        match self.get_mut(id) {
            Some(Symbol::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn module(&self, id: MemberId) -> Option<&ModuleSymbol> {
        match self.get(id) {
            Some(Symbol::Module(module)) => Some(module),
            _ => None,
        }
    }

    pub fn module_mut(&mut self, id: MemberId) -> Option<&mut ModuleSymbol> {
        match self.get_mut(id) {
            Some(Symbol::Module(module)) => Some(module),
            _ => None,
        }
    }

    pub fn package_or_create(&mut self, name: &Name) -> MemberId {
        match self.find_package(name) {
            Some(id) => id,
            None => self.push(Symbol::Package(PackageSymbol::new(name.clone()))),
        }
    }

    /// Find or create the class `name`, linking it with a same-named module.
    pub fn class_or_create(&mut self, name: &Name) -> MemberId {
        if let Some(id) = self.find_class(name) {
            return id;
        }
        let companion = self.find_module(name);
        let mut class = ClassSymbol::new(name.clone());
        class.companion = companion;
        let id = self.push(Symbol::Class(class));
        if let Some(module) = companion.and_then(|m| self.module_mut(m)) {
            module.companion = Some(id);
        }
        id
    }

    /// Find or create the module `name`, linking it with a same-named class.
    pub fn module_or_create(&mut self, name: &Name) -> MemberId {
        if let Some(id) = self.find_module(name) {
            return id;
        }
        let companion = self.find_class(name);
        let mut module = ModuleSymbol::new(name.clone());
        module.companion = companion;
        let id = self.push(Symbol::Module(module));
        if let Some(class) = companion.and_then(|c| self.class_mut(c)) {
            class.companion = Some(id);
        }
        id
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A package. The root of an import is an unnamed package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSymbol {
    pub name: Name,
    pub members: Members,
    /// Opened by a TypeScript namespace, so it also exists on the JS side.
    pub is_namespace: bool,
}

impl PackageSymbol {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            members: Members::default(),
            is_namespace: false,
        }
    }

    /// The unnamed package at the top of the tree.
    pub fn root() -> Self {
        PackageSymbol::new(Name::new(""))
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }
}

/// A trait (interface-like) or class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSymbol {
    pub name: Name,
    pub members: Members,
    pub type_params: Vec<Name>,
    pub parents: Vec<TypeRef>,
    /// Cleared once a constructor is installed.
    pub is_trait: bool,
    pub companion: Option<MemberId>,
}

impl ClassSymbol {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            members: Members::default(),
            type_params: Vec::new(),
            parents: Vec::new(),
            is_trait: true,
            companion: None,
        }
    }

    /// The class applied to its own type parameters, e.g. `Box[T]`.
    pub fn self_type(&self) -> TypeRef {
        TypeRef::new(
            QualifiedName::from_name(self.name.clone()),
            self.type_params
                .iter()
                .map(|tp| TypeRef::new(QualifiedName::from_name(tp.clone()), Vec::new()))
                .collect(),
        )
    }
}

/// A singleton object.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSymbol {
    pub name: Name,
    pub members: Members,
    pub companion: Option<MemberId>,
}

impl ModuleSymbol {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            members: Members::default(),
            companion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSymbol {
    pub name: Name,
    pub tpe: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSymbol {
    pub name: Name,
    pub type_params: Vec<Name>,
    pub params: Vec<ParamSymbol>,
    pub result: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSymbol {
    pub name: Name,
    pub tpe: TypeRef,
    pub optional: bool,
}
