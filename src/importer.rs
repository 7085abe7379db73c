//! Build the Scala.js namespace tree from a parsed declaration document.

use std::fmt;

use tracing::debug;

use crate::ast::{CoreType, Declaration, Document, Member, Param, Signature, Type, TypeParam};
use crate::model::{
    ClassSymbol, FieldSymbol, MemberId, Members, MethodSymbol, Name, PackageSymbol, ParamSymbol,
    QualifiedName, Symbol, TypeRef,
};

/// Something the importer could not translate faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The construct was replaced by a comment placeholder.
    Unsupported,
    /// A type was widened, usually to `js.Any`.
    Simplified,
    /// The construct was dropped.
    Skipped,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarningKind::Unsupported => "unsupported",
            WarningKind::Simplified => "simplified",
            WarningKind::Skipped => "skipped",
        })
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Import `document` under the dotted package path `output_path`.
pub fn import_document(document: &Document, output_path: &str) -> PackageSymbol {
    Importer::new().import(document, output_path)
}

/// How members of a container are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerKind {
    /// A value declared with an object type, or the static side of a class.
    Module,
    /// An interface or an object type alias.
    Interface,
    /// A class declaration.
    Class,
}

#[derive(Debug, Default)]
pub struct Importer {
    warnings: Vec<Warning>,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        debug!(%kind, "{message}");
        self.warnings.push(Warning { message, kind });
    }

    /// Import `document` into a fresh root package, nesting its declarations
    /// under the packages named by `output_path`.
    pub fn import(&mut self, document: &Document, output_path: &str) -> PackageSymbol {
        let path = QualifiedName::parse_dotted(output_path);
        debug!(
            declarations = document.declarations.len(),
            package = %path,
            "importing document"
        );

        let mut root = PackageSymbol::root();
        if let Some(target) = package_members(&mut root.members, path.segments(), false) {
            self.import_declarations(target, &document.declarations);
        }
        root
    }

    fn import_declarations(&mut self, container: &mut Members, declarations: &[Declaration]) {
        for (i, decl) in declarations.iter().enumerate() {
            self.import_declaration(container, decl, &declarations[i + 1..]);
        }
    }

    fn import_declaration(&mut self, container: &mut Members, decl: &Declaration, later: &[Declaration]) {
        match decl {
            Declaration::Variable(var) => match &var.ty {
                Some(Type::Object(members)) => {
                    let id = container.module_or_create(&Name::new(&var.name));
                    self.import_members(container, id, OwnerKind::Module, members, later);
                }
                ty => {
                    let tpe = self.field_type(ty.as_ref());
                    container.push(Symbol::Field(FieldSymbol {
                        name: Name::new(&var.name),
                        tpe,
                    }));
                }
            },
            Declaration::Function(func) => {
                self.push_methods(container, Name::new(&func.name), &func.signature);
            }
            Declaration::Interface(iface) => {
                let id = container.class_or_create(&Name::new(&iface.name));
                let parents: Vec<TypeRef> = iface
                    .extends
                    .iter()
                    .map(|ty| self.type_to_scala(ty, false))
                    .collect();
                if let Some(class) = container.class_mut(id) {
                    merge_class_header(class, &iface.type_params, parents);
                }
                self.import_members(container, id, OwnerKind::Interface, &iface.members, later);
            }
            Declaration::TypeAlias(alias) => match &alias.ty {
                Type::Object(members) => {
                    let id = container.class_or_create(&Name::new(&alias.name));
                    if let Some(class) = container.class_mut(id) {
                        merge_class_header(class, &alias.type_params, Vec::new());
                    }
                    self.import_members(container, id, OwnerKind::Interface, members, later);
                }
                _ => self.push_comment(container, decl.to_string()),
            },
            Declaration::Class(class_decl) => {
                let id = container.class_or_create(&Name::new(&class_decl.name));
                let parents: Vec<TypeRef> = class_decl
                    .extends
                    .iter()
                    .chain(&class_decl.implements)
                    .map(|ty| self.type_to_scala(ty, false))
                    .collect();
                if let Some(class) = container.class_mut(id) {
                    merge_class_header(class, &class_decl.type_params, parents);
                }
                self.import_members(container, id, OwnerKind::Class, &class_decl.members, later);
            }
            Declaration::Namespace(ns) => {
                let path: Vec<Name> = ns.path.iter().map(Name::new).collect();
                if let Some(inner) = package_members(container, &path, true) {
                    self.import_declarations(inner, &ns.declarations);
                }
            }
            Declaration::Unsupported(text) => self.push_comment(container, text.clone()),
        }
    }

    fn push_comment(&mut self, container: &mut Members, text: String) {
        self.warn(WarningKind::Unsupported, format!("`{text}` kept as a comment"));
        container.push_comment(text);
    }

    fn import_members(
        &mut self,
        container: &mut Members,
        owner: MemberId,
        kind: OwnerKind,
        members: &[Member],
        later: &[Declaration],
    ) {
        for member in members {
            self.import_member(container, owner, kind, member, later);
        }
    }

    /// Import one member of the container `owner`, a child of `container`.
    fn import_member(
        &mut self,
        container: &mut Members,
        owner: MemberId,
        kind: OwnerKind,
        member: &Member,
        later: &[Declaration],
    ) {
        match member {
            Member::Call(sig) => {
                if let Some(target) = owner_members(container, owner) {
                    self.push_methods(target, Name::apply(), sig);
                }
            }
            Member::Construct(sig) => match kind {
                OwnerKind::Module => {
                    if !self.promote_companion(container, owner, sig, later) {
                        self.push_owner_comment(container, owner, member);
                    }
                }
                OwnerKind::Class => {
                    if let Some(class) = container.class_mut(owner) {
                        self.install_constructor(class, sig);
                    }
                }
                OwnerKind::Interface => self.push_owner_comment(container, owner, member),
            },
            Member::Index { .. } => self.push_owner_comment(container, owner, member),
            Member::Property { name, ty, .. } => {
                if name == "prototype" {
                    self.warn(WarningKind::Skipped, format!("property `{member}` skipped"));
                    return;
                }
                let tpe = self.field_type(ty.as_ref());
                if let Some(target) = owner_members(container, owner) {
                    let name = member_name(target, name);
                    target.push(Symbol::Field(FieldSymbol { name, tpe }));
                }
            }
            Member::Method {
                name, signature, ..
            } => {
                if kind == OwnerKind::Class && name == "constructor" {
                    if let Some(class) = container.class_mut(owner) {
                        self.install_constructor(class, signature);
                    }
                } else if let Some(target) = owner_members(container, owner) {
                    let name = member_name(target, name);
                    self.push_methods(target, name, signature);
                }
            }
            Member::Static(inner) => {
                if kind != OwnerKind::Class {
                    self.import_member(container, owner, kind, inner, later);
                    return;
                }
                let Some(name) = container.get(owner).and_then(Symbol::name).cloned() else {
                    return;
                };
                let module = container.module_or_create(&name);
                self.import_member(container, module, OwnerKind::Module, inner, later);
            }
        }
    }

    fn push_owner_comment(&mut self, container: &mut Members, owner: MemberId, member: &Member) {
        if let Some(target) = owner_members(container, owner) {
            self.push_comment(target, member.to_string());
        }
    }

    /// Turn a construct signature on the value `module` into a constructor of
    /// its companion class. Only signatures returning the class applied to its
    /// own type parameters qualify.
    fn promote_companion(
        &mut self,
        container: &mut Members,
        module: MemberId,
        sig: &Signature,
        later: &[Declaration],
    ) -> bool {
        let Some(name) = container.module(module).map(|m| m.name.clone()) else {
            return false;
        };
        let type_params = match container.find_class(&name).and_then(|id| container.class(id)) {
            Some(class) => class.type_params.clone(),
            None => later_type_params(later, &name),
        };
        let Some(result) = &sig.result else {
            return false;
        };
        if !is_self_type(result, &name, &type_params) {
            return false;
        }

        let class_id = container.class_or_create(&name);
        let Some(class) = container.class_mut(class_id) else {
            return false;
        };
        if class.type_params.is_empty() {
            class.type_params = type_params;
        }
        merge_class_header(class, &[], Vec::new());
        debug!(class = %name, "promoted construct signature to companion constructor");
        self.install_constructor(class, sig);
        true
    }

    fn install_constructor(&mut self, class: &mut ClassSymbol, sig: &Signature) {
        class.is_trait = false;
        if !sig.type_params.is_empty() {
            self.warn(
                WarningKind::Simplified,
                format!("type parameters dropped from constructor of `{}`", class.name),
            );
        }
        let params = self.params_to_scala(&sig.params);
        for params in make_alternatives(&params) {
            class.members.push(Symbol::Method(MethodSymbol {
                name: Name::constructor(),
                type_params: Vec::new(),
                params,
                result: TypeRef::unit(),
            }));
        }
    }

    /// Add one method per overload alternative of `sig`.
    fn push_methods(&mut self, target: &mut Members, name: Name, sig: &Signature) {
        let type_params: Vec<Name> = sig.type_params.iter().map(|tp| Name::new(&tp.name)).collect();
        let params = self.params_to_scala(&sig.params);
        let result = self.result_type(sig.result.as_ref());
        for params in make_alternatives(&params) {
            target.push(Symbol::Method(MethodSymbol {
                name: name.clone(),
                type_params: type_params.clone(),
                params,
                result: result.clone(),
            }));
        }
    }

    fn params_to_scala(&mut self, params: &[Param]) -> Vec<ParamSymbol> {
        params
            .iter()
            .map(|param| ParamSymbol {
                name: Name::new(&param.name),
                tpe: self.field_type(param.ty.as_ref()),
                optional: param.optional,
            })
            .collect()
    }

    /// Fields and parameters without a type are `js.Any`.
    fn field_type(&mut self, ty: Option<&Type>) -> TypeRef {
        match ty {
            Some(ty) => self.type_to_scala(ty, false),
            None => TypeRef::any(),
        }
    }

    /// Method results without a type are `js.Dynamic`.
    fn result_type(&mut self, ty: Option<&Type>) -> TypeRef {
        match ty {
            Some(ty) => self.type_to_scala(ty, true),
            None => TypeRef::dynamic(),
        }
    }

    /// Map a declaration type to a Scala type. `any` becomes `js.Dynamic`
    /// instead of `js.Any` when `any_as_dynamic` is set.
    pub fn type_to_scala(&mut self, ty: &Type, any_as_dynamic: bool) -> TypeRef {
        match ty {
            Type::Core(core) => match core {
                CoreType::Any if any_as_dynamic => TypeRef::dynamic(),
                CoreType::Any => TypeRef::any(),
                CoreType::Void => TypeRef::unit(),
                CoreType::Number => TypeRef::number(),
                CoreType::Bool | CoreType::Boolean => TypeRef::boolean(),
                CoreType::String => TypeRef::string(),
            },
            Type::Named { name, args } => match (name.as_slice(), args.as_slice()) {
                ([array], [elem]) if array == "Array" => {
                    TypeRef::array(self.type_to_scala(elem, false))
                }
                ([function], []) if function == "Function" => TypeRef::function_base(),
                _ => TypeRef::new(
                    QualifiedName::from_segments(name.iter().map(Name::new).collect()),
                    args.iter().map(|arg| self.type_to_scala(arg, false)).collect(),
                ),
            },
            Type::Function(sig) => self.function_type(ty, sig),
            Type::Repeated(elem) => TypeRef::repeated(self.type_to_scala(elem, false)),
            Type::Parenthesized(inner) => self.type_to_scala(inner, any_as_dynamic),
            Type::Object(_)
            | Type::Constructor(_)
            | Type::Union(_)
            | Type::Intersection(_)
            | Type::Tuple(_)
            | Type::Literal(_)
            | Type::Query(_) => {
                self.warn(WarningKind::Simplified, format!("type `{ty}` mapped to js.Any"));
                TypeRef::any()
            }
        }
    }

    fn function_type(&mut self, ty: &Type, sig: &Signature) -> TypeRef {
        let mut args: Vec<TypeRef> = sig
            .params
            .iter()
            .map(|param| self.field_type(param.ty.as_ref()))
            .collect();
        if !sig.type_params.is_empty() || args.iter().any(|arg| arg.as_repeated().is_some()) {
            self.warn(
                WarningKind::Simplified,
                format!("function type `{ty}` mapped to js.Function"),
            );
            return TypeRef::function_base();
        }
        args.push(self.field_type(sig.result.as_ref()));
        TypeRef::function(args)
    }
}

/// The overload alternatives of a parameter list: the full list plus every
/// prefix obtained by dropping trailing optional parameters, shortest first.
/// Only the full list keeps its parameters marked optional.
pub fn make_alternatives(params: &[ParamSymbol]) -> Vec<Vec<ParamSymbol>> {
    let required = params
        .iter()
        .rposition(|param| !param.optional)
        .map_or(0, |i| i + 1);
    let mut alternatives: Vec<Vec<ParamSymbol>> = (required..params.len())
        .map(|len| {
            params[..len]
                .iter()
                .cloned()
                .map(|param| ParamSymbol {
                    optional: false,
                    ..param
                })
                .collect()
        })
        .collect();
    alternatives.push(params.to_vec());
    alternatives
}

/// The member list of the package at `path` below `members`, creating
/// packages as needed. Packages on a namespace path are marked as such.
fn package_members<'a>(
    members: &'a mut Members,
    path: &[Name],
    namespace: bool,
) -> Option<&'a mut Members> {
    match path.split_first() {
        None => Some(members),
        Some((first, rest)) => {
            let id = members.package_or_create(first);
            let Some(Symbol::Package(package)) = members.get_mut(id) else {
                return None;
            };
            package.is_namespace |= namespace;
            package_members(&mut package.members, rest, namespace)
        }
    }
}

fn owner_members(container: &mut Members, owner: MemberId) -> Option<&mut Members> {
    container.get_mut(owner)?.members_mut()
}

/// Source names that are empty get a synthesized name.
fn member_name(target: &mut Members, name: &str) -> Name {
    if name.is_empty() {
        target.new_anonymous_name()
    } else {
        Name::new(name)
    }
}

/// Append type parameters and parents not already present on `class`.
/// A class with no declared parent extends `js.Object` until a parent is declared.
fn merge_class_header(class: &mut ClassSymbol, type_params: &[TypeParam], parents: Vec<TypeRef>) {
    for tp in type_params {
        let name = Name::new(&tp.name);
        if !class.type_params.contains(&name) {
            class.type_params.push(name);
        }
    }
    if parents.is_empty() {
        if class.parents.is_empty() {
            class.parents.push(TypeRef::object());
        }
        return;
    }
    class.parents.retain(|parent| *parent != TypeRef::object());
    for parent in parents {
        if !class.parents.contains(&parent) {
            class.parents.push(parent);
        }
    }
}

/// Type parameters of the first later declaration that defines the class `name`.
fn later_type_params(later: &[Declaration], name: &Name) -> Vec<Name> {
    let names = |params: &[TypeParam]| -> Vec<Name> {
        params.iter().map(|tp| Name::new(&tp.name)).collect()
    };
    later
        .iter()
        .find_map(|decl| match decl {
            Declaration::Interface(iface) if iface.name == name.as_str() => {
                Some(names(&iface.type_params))
            }
            Declaration::Class(class) if class.name == name.as_str() => {
                Some(names(&class.type_params))
            }
            Declaration::TypeAlias(alias)
                if alias.name == name.as_str() && matches!(alias.ty, Type::Object(_)) =>
            {
                Some(names(&alias.type_params))
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// Whether `ty` is `name<T1, ..., Tn>` applied to exactly `type_params`.
fn is_self_type(ty: &Type, name: &Name, type_params: &[Name]) -> bool {
    match ty {
        Type::Parenthesized(inner) => is_self_type(inner, name, type_params),
        Type::Named { name: path, args } => {
            matches!(path.as_slice(), [single] if single == name.as_str())
                && args.len() == type_params.len()
                && args.iter().zip(type_params).all(|(arg, tp)| {
                    matches!(arg, Type::Named { name: arg_name, args: arg_args }
                        if arg_args.is_empty() && matches!(arg_name.as_slice(), [n] if n == tp.as_str()))
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn import(src: &str) -> (PackageSymbol, Vec<Warning>) {
        let doc = parse(src).unwrap();
        let mut importer = Importer::new();
        let root = importer.import(&doc, "");
        (root, importer.into_warnings())
    }

    fn methods<'a>(members: &'a Members, name: &str) -> Vec<&'a MethodSymbol> {
        members
            .iter()
            .filter_map(|s| match s {
                Symbol::Method(m) if m.name.as_str() == name => Some(m),
                _ => None,
            })
            .collect()
    }

    fn class<'a>(members: &'a Members, name: &str) -> &'a ClassSymbol {
        let id = members.find_class(&Name::new(name)).expect("class");
        members.class(id).unwrap()
    }

    fn param(name: &str, optional: bool) -> ParamSymbol {
        ParamSymbol {
            name: Name::new(name),
            tpe: TypeRef::number(),
            optional,
        }
    }

    #[test]
    fn test_make_alternatives() {
        let params = vec![param("a", false), param("b", true), param("c", true)];
        let alternatives = make_alternatives(&params);

        let lengths: Vec<usize> = alternatives.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![1, 2, 3]);
        for alt in &alternatives {
            let names: Vec<&Name> = alt.iter().map(|p| &p.name).collect();
            let expected: Vec<&Name> = params[..alt.len()].iter().map(|p| &p.name).collect();
            assert_eq!(names, expected);
        }
        assert!(alternatives[..2].iter().flatten().all(|p| !p.optional));
        assert_eq!(alternatives[2], params);

        assert_eq!(make_alternatives(&[]), vec![Vec::<ParamSymbol>::new()]);
        // Only trailing optionals are dropped.
        let params = vec![param("a", true), param("b", false)];
        assert_eq!(make_alternatives(&params).len(), 1);
    }

    #[test]
    fn test_overloads_from_optional_params() {
        let (root, _) = import("declare function f(a: number, b?: string, c?: boolean): void;");

        let overloads = methods(&root.members, "f");
        assert_eq!(overloads.len(), 3);
        assert_eq!(overloads[0].params.len(), 1);
        assert_eq!(overloads[2].params.len(), 3);
        assert!(overloads[2].params[2].optional);
        assert_eq!(overloads[0].result, TypeRef::unit());
    }

    #[test]
    fn test_only_longest_overload_keeps_optional_params() {
        let (root, _) = import("declare function f(a?: number, b?: string): void;");

        let overloads = methods(&root.members, "f");
        let lengths: Vec<usize> = overloads.iter().map(|m| m.params.len()).collect();
        assert_eq!(lengths, vec![0, 1, 2]);
        assert!(!overloads[1].params[0].optional);
        assert!(overloads[2].params.iter().all(|p| p.optional));
    }

    #[test]
    fn test_any_is_dynamic_only_in_result_position() {
        let (root, _) = import(
            "declare var v: any;
             declare function f(x: any): any;
             declare function g();",
        );

        let Some(Symbol::Field(field)) = root.members.iter().next() else {
            panic!("expected field");
        };
        assert_eq!(field.tpe, TypeRef::any());

        let f = methods(&root.members, "f")[0];
        assert_eq!(f.params[0].tpe, TypeRef::any());
        assert_eq!(f.result, TypeRef::dynamic());

        let g = methods(&root.members, "g")[0];
        assert_eq!(g.result, TypeRef::dynamic());
    }

    #[test]
    fn test_type_mapping() {
        let mut importer = Importer::new();
        let cases = [
            ("declare var v: string[];", "js.Array[String]"),
            ("declare var v: Array<number>;", "js.Array[Double]"),
            ("declare var v: Function;", "js.Function"),
            ("declare var v: (a: number, b: string) => boolean;", "js.Function2[Double, String, Boolean]"),
            ("declare var v: () => void;", "js.Function0[Unit]"),
            ("declare var v: <T>(a: T) => T;", "js.Function"),
            ("declare var v: (...xs: any[]) => void;", "js.Function"),
            ("declare var v: ns.Thing<bool>;", "ns.Thing[Boolean]"),
            ("declare var v: (string);", "String"),
            ("declare var v: string | number;", "js.Any"),
            ("declare var v: [number, number];", "js.Any"),
        ];
        for (src, expected) in cases {
            let doc = parse(src).unwrap();
            let Declaration::Variable(var) = &doc.declarations[0] else {
                panic!("expected variable");
            };
            let tpe = importer.type_to_scala(var.ty.as_ref().unwrap(), false);
            assert_eq!(tpe.to_string(), expected, "{src}");
        }
        assert!(importer
            .warnings()
            .iter()
            .all(|w| w.kind == WarningKind::Simplified));
    }

    #[test]
    fn test_vararg_param() {
        let (root, _) = import("declare function log(...xs: string[]): void;");

        let log = methods(&root.members, "log")[0];
        assert_eq!(log.params[0].tpe.as_repeated(), Some(&TypeRef::string()));
    }

    #[test]
    fn test_object_variable_becomes_module() {
        let (root, _) = import("declare var Foo: { x: number; bar(y?: string): void; };");

        let id = root.members.find_module(&Name::new("Foo")).expect("module");
        let module = root.members.module(id).unwrap();
        let Some(Symbol::Field(x)) = module.members.iter().next() else {
            panic!("expected field");
        };
        assert_eq!(x.tpe, TypeRef::number());
        let bars = methods(&module.members, "bar");
        assert_eq!(bars.len(), 2);
        assert!(bars[0].params.is_empty());
        assert_eq!(bars[1].params[0].tpe, TypeRef::string());
    }

    #[test]
    fn test_companion_promotion_either_order() {
        let interface_first = "interface Box<T> { get(): T; }
             declare var Box: { new(v: T): Box<T>; };";
        let value_first = "declare var Box: { new(v: T): Box<T>; };
             interface Box<T> { get(): T; }";

        for src in [interface_first, value_first] {
            let (root, _) = import(src);

            let class = class(&root.members, "Box");
            assert!(!class.is_trait, "{src}");
            assert_eq!(class.type_params, vec![Name::new("T")]);
            assert_eq!(class.parents, vec![TypeRef::object()]);
            let ctors = methods(&class.members, "<init>");
            assert_eq!(ctors.len(), 1);
            assert_eq!(ctors[0].result, TypeRef::unit());
            assert_eq!(methods(&class.members, "get").len(), 1);

            let module_id = root.members.find_module(&Name::new("Box")).unwrap();
            let class_id = root.members.find_class(&Name::new("Box")).unwrap();
            assert_eq!(class.companion, Some(module_id));
            assert_eq!(root.members.module(module_id).unwrap().companion, Some(class_id));
            assert_eq!(root.members.len(), 2);
        }
    }

    #[test]
    fn test_promoted_class_extends_object() {
        let (root, _) = import("declare var Foo: { new(): Foo; };");

        let foo = class(&root.members, "Foo");
        assert!(!foo.is_trait);
        assert_eq!(foo.parents, vec![TypeRef::object()]);
    }

    #[test]
    fn test_declared_parent_replaces_default_object() {
        let (root, _) = import(
            "declare var Foo: { new(): Foo; };
             interface Foo extends Base { }",
        );

        let foo = class(&root.members, "Foo");
        assert_eq!(foo.parents, vec![TypeRef::new(QualifiedName::parse_dotted("Base"), vec![])]);
    }

    #[test]
    fn test_interface_with_own_construct_signature_and_companion() {
        let (root, _) = import(
            "declare interface Box<T> { new(v: T): Box<T>; get(): T; }
             declare var Box: { new(v: T): Box<T>; };",
        );

        let boxed = class(&root.members, "Box");
        assert!(!boxed.is_trait);
        assert_eq!(methods(&boxed.members, "<init>").len(), 1);
        assert_eq!(methods(&boxed.members, "get").len(), 1);
        let comments: Vec<&str> = boxed
            .members
            .iter()
            .filter_map(|s| match s {
                Symbol::Comment(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(comments, vec!["new (v: T): Box<T>"]);
    }

    #[test]
    fn test_construct_with_other_result_is_comment() {
        let (root, warnings) = import(
            "interface Box<T> { }
             declare var Box: { new(v: number): Box<number>; };",
        );

        assert!(class(&root.members, "Box").is_trait);
        let id = root.members.find_module(&Name::new("Box")).unwrap();
        let module = root.members.module(id).unwrap();
        assert!(matches!(module.members.iter().next(), Some(Symbol::Comment(_))));
        assert!(warnings.iter().any(|w| w.kind == WarningKind::Unsupported));
    }

    #[test]
    fn test_unsupported_declaration_is_single_comment() {
        let (root, warnings) = import("declare enum Color { Red, Green }");

        assert_eq!(root.members.len(), 1);
        let Some(Symbol::Comment(text)) = root.members.iter().next() else {
            panic!("expected comment");
        };
        assert!(!text.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Unsupported);
    }

    #[test]
    fn test_interface_members() {
        let (root, _) = import(
            "interface Callable {
                 (x: number): string;
                 [key: string]: any;
                 prototype: any;
                 '': number;
                 new (): Callable;
             }",
        );

        let class = class(&root.members, "Callable");
        assert!(class.is_trait);
        let kinds: Vec<&str> = class
            .members
            .iter()
            .map(|s| match s {
                Symbol::Method(m) => m.name.as_str(),
                Symbol::Field(f) => f.name.as_str(),
                Symbol::Comment(_) => "comment",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["apply", "comment", "anonymous$1", "comment"]);
    }

    #[test]
    fn test_class_declaration() {
        let (root, _) = import(
            "declare class Server<T> extends Base implements Closeable {
                 constructor(port?: number);
                 static create(): Server<any>;
                 listen(): void;
             }",
        );

        let class = class(&root.members, "Server");
        assert!(!class.is_trait);
        let parents: Vec<String> = class.parents.iter().map(ToString::to_string).collect();
        assert_eq!(parents, vec!["Base", "Closeable"]);
        assert_eq!(methods(&class.members, "<init>").len(), 2);
        assert_eq!(methods(&class.members, "listen").len(), 1);
        assert!(methods(&class.members, "create").is_empty());

        let id = root.members.find_module(&Name::new("Server")).unwrap();
        let module = root.members.module(id).unwrap();
        assert_eq!(methods(&module.members, "create").len(), 1);
        assert!(class.companion.is_some());
    }

    #[test]
    fn test_output_path_and_namespaces() {
        let doc = parse("declare namespace a.b { var x: number; } declare namespace a { var y: string; }")
            .unwrap();
        let root = import_document(&doc, "com.example");

        let Some(Symbol::Package(com)) = root.members.iter().next() else {
            panic!("expected package");
        };
        let Some(Symbol::Package(example)) = com.members.iter().next() else {
            panic!("expected package");
        };
        assert_eq!(example.name, Name::new("example"));
        assert_eq!(example.members.len(), 1);
        let Some(Symbol::Package(a)) = example.members.iter().next() else {
            panic!("expected package");
        };
        // `a` is reopened rather than duplicated.
        assert_eq!(a.members.len(), 2);
        assert!(!com.is_namespace && !example.is_namespace);
        assert!(a.is_namespace);
        let Some(Symbol::Package(b)) = a.members.iter().next() else {
            panic!("expected package");
        };
        assert!(b.is_namespace);
    }

    #[test]
    fn test_non_object_type_alias_is_comment() {
        let (root, _) = import("type Id = string;\ntype Point = { x: number; y: number; };");

        assert!(matches!(root.members.iter().next(), Some(Symbol::Comment(_))));
        let point = class(&root.members, "Point");
        assert_eq!(point.members.len(), 2);
    }
}
