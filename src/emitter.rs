//! Render a namespace tree as Scala.js facade source.

use std::fmt;

use crate::model::{ClassSymbol, Members, MethodSymbol, ModuleSymbol, Name, PackageSymbol, ParamSymbol, Symbol};

/// Output formatting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Emit the `js` imports at the top of the unit.
    pub header: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            header: true,
        }
    }
}

impl EmitOptions {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}

/// Render `root` as one Scala compilation unit.
pub fn emit(root: &PackageSymbol, options: &EmitOptions) -> String {
    ScalaSource { root, options }.to_string()
}

/// A package tree paired with the options used to print it.
pub struct ScalaSource<'a> {
    pub root: &'a PackageSymbol,
    pub options: &'a EmitOptions,
}

impl fmt::Display for ScalaSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            out: f,
            options: self.options,
            depth: 0,
            js_path: Vec::new(),
        };
        printer.package(self.root)
    }
}

struct Printer<'a, 'f> {
    out: &'a mut fmt::Formatter<'f>,
    options: &'a EmitOptions,
    depth: usize,
    /// JS names of the enclosing namespace packages.
    js_path: Vec<String>,
}

impl Printer<'_, '_> {
    fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let width = self.depth * self.options.indent;
        write!(self.out, "{:width$}", "")?;
        self.out.write_fmt(args)?;
        self.out.write_str("\n")
    }

    fn blank(&mut self) -> fmt::Result {
        self.out.write_str("\n")
    }

    fn package(&mut self, package: &PackageSymbol) -> fmt::Result {
        if package.is_root() {
            if self.options.header {
                self.line(format_args!("import scala.scalajs.js"))?;
                self.line(format_args!("import js.annotation._"))?;
                if !package.members.is_empty() {
                    self.blank()?;
                }
            }
            return self.package_members(package);
        }

        if package.is_namespace {
            self.js_path.push(package.name.as_str().to_string());
        }
        self.line(format_args!("package {} {{", package.name))?;
        self.blank()?;
        self.depth += 1;
        let result = self.package_members(package);
        self.depth -= 1;
        result?;
        if !package.members.is_empty() {
            self.blank()?;
        }
        if package.is_namespace {
            self.js_path.pop();
        }
        self.line(format_args!("}}"))
    }

    fn nested(&mut self, members: &Members) -> fmt::Result {
        self.depth += 1;
        let result = members.iter().try_for_each(|symbol| self.symbol(symbol));
        self.depth -= 1;
        result
    }

    /// Fields and methods of a package are gathered into one global object,
    /// printed where the first of them was declared. Blocks are separated
    /// from their neighbours by a blank line.
    fn package_members(&mut self, package: &PackageSymbol) -> fmt::Result {
        let mut previous_is_block = None;
        let mut globals_done = false;
        for symbol in &package.members {
            let is_global = matches!(symbol, Symbol::Field(_) | Symbol::Method(_));
            if is_global && globals_done {
                continue;
            }
            let is_block = !matches!(symbol, Symbol::Comment(_));
            if let Some(previous) = previous_is_block {
                if is_block || previous {
                    self.blank()?;
                }
            }
            previous_is_block = Some(is_block);
            if is_global {
                globals_done = true;
                self.globals(package)?;
            } else {
                self.symbol(symbol)?;
            }
        }
        Ok(())
    }

    fn globals(&mut self, package: &PackageSymbol) -> fmt::Result {
        self.line(format_args!("@js.native"))?;
        if self.js_path.is_empty() {
            self.line(format_args!("@JSGlobalScope"))?;
            self.line(format_args!("object {GLOBALS} extends js.Object {{"))?;
        } else {
            let path = self.js_path.join(".");
            self.line(format_args!("@JSGlobal(\"{path}\")"))?;
            self.line(format_args!("object {} extends js.Object {{", package.name))?;
        }
        self.depth += 1;
        for symbol in &package.members {
            if matches!(symbol, Symbol::Field(_) | Symbol::Method(_)) {
                self.symbol(symbol)?;
            }
        }
        self.depth -= 1;
        self.line(format_args!("}}"))
    }

    /// The `@JSGlobal` annotation for a class or object named `name`.
    fn js_global(&self, name: &Name) -> String {
        if self.js_path.is_empty() {
            "@JSGlobal".to_string()
        } else {
            format!("@JSGlobal(\"{}.{}\")", self.js_path.join("."), name.as_str())
        }
    }

    fn symbol(&mut self, symbol: &Symbol) -> fmt::Result {
        match symbol {
            Symbol::Comment(text) => self.line(format_args!("/* ??? {} */", comment_text(text))),
            Symbol::Package(package) => self.package(package),
            Symbol::Class(class) => self.class(class),
            Symbol::Module(module) => self.module(module),
            Symbol::Field(field) => {
                self.line(format_args!("var {}: {} = js.native", field.name, field.tpe))
            }
            Symbol::Method(method) => self.method(method),
        }
    }

    fn class(&mut self, class: &ClassSymbol) -> fmt::Result {
        let keyword = if class.is_trait { "trait" } else { "class" };
        let parents = if class.parents.is_empty() {
            "js.Object".to_string()
        } else {
            join(&class.parents, " with ")
        };
        self.line(format_args!("@js.native"))?;
        if !class.is_trait {
            let annotation = self.js_global(&class.name);
            self.line(format_args!("{annotation}"))?;
        }
        self.line(format_args!(
            "{keyword} {}{} extends {parents} {{",
            class.name,
            type_params(&class.type_params)
        ))?;
        self.nested(&class.members)?;
        self.line(format_args!("}}"))
    }

    fn module(&mut self, module: &ModuleSymbol) -> fmt::Result {
        let annotation = self.js_global(&module.name);
        self.line(format_args!("@js.native"))?;
        self.line(format_args!("{annotation}"))?;
        self.line(format_args!("object {} extends js.Object {{", module.name))?;
        self.nested(&module.members)?;
        self.line(format_args!("}}"))
    }

    fn method(&mut self, method: &MethodSymbol) -> fmt::Result {
        let params = join(&method.params.iter().map(param).collect::<Vec<_>>(), ", ");
        if method.name.is_constructor() {
            // A parameterless constructor is implied by the class itself.
            if method.params.is_empty() {
                return Ok(());
            }
            return self.line(format_args!("def this({params}) = this()"));
        }
        self.line(format_args!(
            "def {}{}({params}): {} = js.native",
            method.name,
            type_params(&method.type_params),
            method.result
        ))
    }
}

/// Name of the object holding the fields and methods of a non-namespace package.
const GLOBALS: &str = "Globals";

fn param(param: &ParamSymbol) -> String {
    // A repeated parameter cannot take a default.
    if param.optional && param.tpe.as_repeated().is_none() {
        format!("{}: {} = ???", param.name, param.tpe)
    } else {
        format!("{}: {}", param.name, param.tpe)
    }
}

fn type_params(names: &[Name]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!("[{}]", join(names, ", "))
    }
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Break up comment delimiters, which nest in Scala.
fn comment_text(text: &str) -> String {
    text.replace("/*", "/ *").replace("*/", "* /")
}
