//! End-to-end translations through the public API.

use ts_importer::model::{Name, Symbol};
use ts_importer::{import_document, parse, translate, EmitOptions, WarningKind};

fn scala(src: &str) -> String {
    let options = EmitOptions::default().with_header(false);
    translate(src, "", &options).unwrap().code
}

#[test]
fn object_variable_becomes_object_with_overloads() {
    let out = scala("declare var Foo: { x: number; bar(y?: string): void; };");

    assert_eq!(
        out,
        "\
@js.native
@JSGlobal
object Foo extends js.Object {
  var x: Double = js.native
  def bar(): Unit = js.native
  def bar(y: String = ???): Unit = js.native
}
"
    );
}

#[test]
fn companion_constructor_from_value_declaration() {
    let src = "
interface Box<T> {
    get(): T;
}
declare var Box: {
    new (v: T): Box<T>;
};
";
    let out = scala(src);

    assert_eq!(
        out,
        "\
@js.native
@JSGlobal
class Box[T] extends js.Object {
  def get(): T = js.native
  def this(v: T) = this()
}

@js.native
@JSGlobal
object Box extends js.Object {
}
"
    );
}

#[test]
fn interface_construct_signature_with_companion_value() {
    let src = "
declare interface Box<T> { new(v: T): Box<T>; get(): T; }
declare var Box: { new(v: T): Box<T>; };
";
    let out = scala(src);

    assert_eq!(
        out,
        "\
@js.native
@JSGlobal
class Box[T] extends js.Object {
  /* ??? new (v: T): Box<T> */
  def get(): T = js.native
  def this(v: T) = this()
}

@js.native
@JSGlobal
object Box extends js.Object {
}
"
    );
    assert_eq!(out.matches("def this(v: T) = this()").count(), 1);
    assert_eq!(out.matches("get(): T").count(), 1);
}

#[test]
fn only_longest_overload_has_defaults() {
    let out = scala("declare function f(a?: number, b?: string): void;");

    assert_eq!(
        out,
        "\
@js.native
@JSGlobalScope
object Globals extends js.Object {
  def f(): Unit = js.native
  def f(a: Double): Unit = js.native
  def f(a: Double = ???, b: String = ???): Unit = js.native
}
"
    );
}

#[test]
fn companion_detection_is_order_independent() {
    let interface_first = "interface Box<T> { get(): T; }\ndeclare var Box: { new (v: T): Box<T>; };";
    let value_first = "declare var Box: { new (v: T): Box<T>; };\ninterface Box<T> { get(): T; }";

    for src in [interface_first, value_first] {
        let doc = parse(src).unwrap();
        let root = import_document(&doc, "");

        let class_id = root.members.find_class(&Name::new("Box")).unwrap();
        let module_id = root.members.find_module(&Name::new("Box")).unwrap();
        let class = root.members.class(class_id).unwrap();
        assert!(!class.is_trait);
        assert_eq!(class.companion, Some(module_id));
        assert_eq!(root.members.module(module_id).unwrap().companion, Some(class_id));

        let ctors = class
            .members
            .iter()
            .filter(|s| matches!(s, Symbol::Method(m) if m.name.is_constructor()))
            .count();
        assert_eq!(ctors, 1);
    }
}

#[test]
fn vararg_parameter() {
    let out = scala("declare function log(message: string, ...rest: any[]): void;");

    assert_eq!(
        out,
        "\
@js.native
@JSGlobalScope
object Globals extends js.Object {
  def log(message: String, rest: js.Any*): Unit = js.native
}
"
    );
}

#[test]
fn optional_vararg_has_no_default() {
    let out = scala("declare function log(...rest?: any[]): void;");

    assert!(out.contains("  def log(): Unit = js.native\n"), "{out}");
    assert!(out.contains("  def log(rest: js.Any*): Unit = js.native\n"), "{out}");
    assert!(!out.contains("???"), "{out}");
}

#[test]
fn reserved_words_are_escaped() {
    let out = scala("interface Node { type: string; val(): number; 'data-id': string; }");

    assert!(out.contains("trait Node extends js.Object {"), "{out}");
    assert!(out.contains("  var `type`: String = js.native"), "{out}");
    assert!(out.contains("  def `val`(): Double = js.native"), "{out}");
    assert!(out.contains("  var `data-id`: String = js.native"), "{out}");
}

#[test]
fn generic_functions_and_callbacks() {
    let out = scala(
        "declare function map<T, U>(xs: T[], f: (x: T) => U): U[];
         declare function on(event: string, handler: Function): any;",
    );

    assert!(
        out.contains("  def map[T, U](xs: js.Array[T], f: js.Function1[T, U]): js.Array[U] = js.native"),
        "{out}"
    );
    assert!(
        out.contains("  def on(event: String, handler: js.Function): js.Dynamic = js.native"),
        "{out}"
    );
}

#[test]
fn interfaces_with_parents_and_call_signatures() {
    let out = scala(
        "interface Base { id: number; }
         interface Fn extends Base, Other<string> {
             (x: number): string;
             [key: string]: any;
         }",
    );

    assert!(out.contains("trait Base extends js.Object {"), "{out}");
    assert!(!out.contains("@JSGlobal"), "{out}");
    assert!(out.contains("trait Fn extends Base with Other[String] {"), "{out}");
    assert!(out.contains("  def apply(x: Double): String = js.native"), "{out}");
    assert!(out.contains("  /* ??? [key: string]: any */"), "{out}");
}

#[test]
fn namespaces_nest_under_output_package() {
    let options = EmitOptions::default();
    let out = translate(
        "declare namespace lib.util { function id(x: number): number; }",
        "facades",
        &options,
    )
    .unwrap()
    .code;

    assert_eq!(
        out,
        "\
import scala.scalajs.js
import js.annotation._

package facades {

  package lib {

    package util {

      @js.native
      @JSGlobal(\"lib.util\")
      object util extends js.Object {
        def id(x: Double): Double = js.native
      }

    }

  }

}
"
    );
}

#[test]
fn unsupported_statements_become_comments() {
    let result = translate(
        "import fs = require(\"fs\");
         declare enum Color { Red, Green }
         declare var ok: boolean;",
        "",
        &EmitOptions::default().with_header(false),
    )
    .unwrap();

    assert_eq!(
        result.code,
        "\
/* ??? import fs = require(\"fs\"); */
/* ??? declare enum Color { Red, Green } */

@js.native
@JSGlobalScope
object Globals extends js.Object {
  var ok: Boolean = js.native
}
"
    );
    let unsupported = result
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::Unsupported)
        .count();
    assert_eq!(unsupported, 2);
}

#[test]
fn comments_keep_source_layout() {
    let out = scala("declare enum E {\n  A,\n  B\n}");

    assert_eq!(out, "/* ??? declare enum E {\n  A,\n  B\n} */\n");
}

#[test]
fn class_declaration_with_statics() {
    let out = scala(
        "declare class Server extends EventEmitter {
             constructor(port: number, host?: string);
             static create(): Server;
             listen(): void;
         }",
    );

    assert_eq!(
        out,
        "\
@js.native
@JSGlobal
class Server extends EventEmitter {
  def this(port: Double) = this()
  def this(port: Double, host: String = ???) = this()
  def listen(): Unit = js.native
}

@js.native
@JSGlobal
object Server extends js.Object {
  def create(): Server = js.native
}
"
    );
}

#[test]
fn malformed_spread_is_a_parse_warning() {
    let result = translate(
        "declare function f(...xs: number): void;",
        "",
        &EmitOptions::default(),
    )
    .unwrap();

    assert_eq!(result.parse_warnings.len(), 1);
    assert!(result.code.contains("  def f(xs: Double): Unit = js.native"), "{}", result.code);
}

#[test]
fn parse_errors_have_positions() {
    let err = translate("declare var x: number;\n  #", "", &EmitOptions::default()).unwrap_err();

    assert_eq!((err.line, err.column), (2, 3));
}
