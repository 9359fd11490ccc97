//! Flint interpreter: executes a parsed library with a tree-walking
//! evaluator.
//!
//! Evaluation state is a stack of scopes with linear, innermost-first
//! lookup. The bottom scope holds top-level functions and enum objects;
//! a fresh scope is pushed for every function call and every loop
//! iteration. Execution starts at `main`, whose final integer value is
//! the program result.

pub mod interpreter;
pub mod scope;
pub mod value;

pub use interpreter::{Builtin, Interpreter};
pub use scope::Scope;
pub use value::{ObjectData, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    fn run_program(input: &str) -> Result<i64, String> {
        let (mut lib, parse_errors) = flint_parser::parse(input);
        assert!(parse_errors.is_empty(), "Parse errors: {:?}", parse_errors);
        // checking is non-fatal; execution proceeds regardless
        let _ = flint_checker::check(&mut lib);
        let mut interpreter = Interpreter::new();
        interpreter.run(&lib).map_err(|e| e.msg)
    }

    fn expect_exit(input: &str, expected: i64) {
        match run_program(input) {
            Ok(actual) => assert_eq!(actual, expected, "Program: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_error(input: &str) {
        if let Ok(v) = run_program(input) {
            panic!("Expected error but program returned {}: {}", v, input);
        }
    }

    #[derive(Clone)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run_capturing(input: &str) -> (i64, String) {
        let (mut lib, parse_errors) = flint_parser::parse(input);
        assert!(parse_errors.is_empty(), "Parse errors: {:?}", parse_errors);
        let _ = flint_checker::check(&mut lib);
        let buf = SharedBuf(Rc::new(RefCell::new(Vec::new())));
        let mut interpreter = Interpreter::with_output(Box::new(buf.clone()));
        let code = interpreter
            .run(&lib)
            .unwrap_or_else(|e| panic!("Program failed: {}\nInput: {}", e, input));
        let output = String::from_utf8(buf.0.borrow().clone()).expect("output is UTF-8");
        (code, output)
    }

    #[test]
    fn test_arithmetic_and_return() {
        // right-recursion groups 2 + (3 * 4)
        expect_exit("fn main() -> i64 { let x: i64 = 2 + 3 * 4; x; }", 14);
        expect_exit("fn main() -> i64 { 10 - 2; }", 8);
        expect_exit("fn main() -> i64 { 84 / 2; }", 42);
    }

    #[test]
    fn test_leftmost_operator_binds_outermost() {
        // a - b + c parses as a - (b + c)
        expect_exit("fn main() -> i64 { 10 - 2 + 3; }", 5);
    }

    #[test]
    fn test_recursive_fibonacci() {
        expect_exit(
            "fn fib(n: i64) -> i64 { if (n < 2) { n; } else { fib(n - 1) + fib(n - 2); } } \
             fn main() -> i64 { fib(10); }",
            55,
        );
    }

    #[test]
    fn test_while_loop_fibonacci() {
        expect_exit(
            "fn main() -> i64 { \
                let a: i64 = 0; let b: i64 = 1; let i: i64 = 0; \
                while (i < 10) { let t: i64 = a + b; a = b; b = t; i = i + 1; } \
                a; }",
            55,
        );
    }

    #[test]
    fn test_enum_access() {
        expect_exit(
            "enum Color { Red, Green, Blue } fn main() -> i64 { Color.Blue; }",
            2,
        );
        expect_exit(
            "enum Color { Red, Green, Blue } fn main() -> i64 { Color.Red; }",
            0,
        );
    }

    #[test]
    fn test_object_construction_and_field_access() {
        expect_exit(
            "object P { x: i64 y: i64 } \
             fn main() -> i64 { let p: P = P { .x = 3, .y = 4 }; p.x + p.y; }",
            7,
        );
    }

    #[test]
    fn test_object_fields_take_declaration_order() {
        // initializer order differs from declaration order; printing
        // follows the declaration
        let (_, output) = run_capturing(
            "object P { x: i64 y: i64 } \
             fn main() -> i64 { let p: P = P { .y = 4, .x = 3 }; println(p); 0; }",
        );
        assert_eq!(output, "P { .x = 3 , .y = 4 }\n");
    }

    #[test]
    fn test_dotted_assignment_mutates_member() {
        expect_exit(
            "object P { x: i64 y: i64 } \
             fn main() -> i64 { let p: P = P { .x = 3, .y = 4 }; p.x = 10; p.x + p.y; }",
            14,
        );
    }

    #[test]
    fn test_nested_object_paths() {
        expect_exit(
            "object P { x: i64 } object Q { p: P } \
             fn main() -> i64 { \
                let q: Q = Q { .p = P { .x = 5 } }; \
                q.p.x = q.p.x + 2; \
                q.p.x; }",
            7,
        );
    }

    #[test]
    fn test_objects_share_by_reference() {
        expect_exit(
            "object P { x: i64 } \
             fn main() -> i64 { \
                let p: P = P { .x = 1 }; \
                let q: P = p; \
                q.x = 9; \
                p.x; }",
            9,
        );
    }

    #[test]
    fn test_conditionals() {
        expect_exit("fn main() -> i64 { if (1) { 10; } else { 20; } }", 10);
        expect_exit("fn main() -> i64 { if (0) { 10; } else { 20; } }", 20);
        // negative conditions take the else branch: the truthiness test is > 0
        expect_exit("fn main() -> i64 { if (0 - 5) { 10; } else { 20; } }", 20);
    }

    #[test]
    fn test_comparisons_yield_one_or_zero() {
        expect_exit("fn main() -> i64 { 5 > 3; }", 1);
        expect_exit("fn main() -> i64 { 3 > 5; }", 0);
        expect_exit("fn main() -> i64 { 5 >= 5; }", 1);
        expect_exit("fn main() -> i64 { 3 <= 2; }", 0);
        expect_exit("fn main() -> i64 { 4 == 4; }", 1);
    }

    #[test]
    fn test_while_with_false_condition_skips_body() {
        expect_exit(
            "fn main() -> i64 { let x: i64 = 1; while (0) { x = 99; } x; }",
            1,
        );
    }

    #[test]
    fn test_loop_scope_is_fresh_per_iteration() {
        // t is re-declared every iteration in the loop's own scope
        expect_exit(
            "fn main() -> i64 { let i: i64 = 0; \
             while (i < 3) { let t: i64 = i; i = t + 1; } i; }",
            3,
        );
    }

    #[test]
    fn test_assignment_creates_binding_when_missing() {
        expect_exit("fn main() -> i64 { x = 42; x; }", 42);
    }

    #[test]
    fn test_let_shadowing_in_same_scope() {
        expect_exit("fn main() -> i64 { let x: i64 = 1; let x: i64 = 2; x; }", 2);
    }

    #[test]
    fn test_overflow_wraps() {
        expect_exit(
            "fn main() -> i64 { let x: i64 = 9223372036854775807 + 1; x == 0 - 9223372036854775808; }",
            1,
        );
    }

    #[test]
    fn test_this_binding_allows_recursion() {
        expect_exit(
            "fn fact(n: i64) -> i64 { if (n < 2) { 1; } else { n * this(n - 1); } } \
             fn main() -> i64 { fact(5); }",
            120,
        );
    }

    #[test]
    fn test_first_class_lambdas() {
        expect_exit(
            "fn main() -> i64 { let inc = (a: i64) -> i64 { a + 1; }; inc(4); }",
            5,
        );
    }

    #[test]
    fn test_function_passed_as_argument() {
        expect_exit(
            "fn twice(f: fn, x: i64) -> i64 { f(f(x)); } \
             fn inc(a: i64) -> i64 { a + 1; } \
             fn main() -> i64 { twice(inc, 5); }",
            7,
        );
    }

    #[test]
    fn test_print_formats() {
        let (code, output) = run_capturing(
            "fn main() -> i64 { print(1, \"two\", 3); 0; }",
        );
        assert_eq!(code, 0);
        assert_eq!(output, "1 two 3");
    }

    #[test]
    fn test_println_appends_newline() {
        let (_, output) = run_capturing("fn main() -> i64 { println(\"hi\"); println(7); 0; }");
        assert_eq!(output, "hi\n7\n");
    }

    #[test]
    fn test_print_returns_zero() {
        expect_exit("fn main() -> i64 { print(\"\"); }", 0);
    }

    #[test]
    fn test_enum_values_print_as_objects() {
        let (_, output) = run_capturing(
            "enum Color { Red, Green } fn main() -> i64 { println(Color); 0; }",
        );
        assert_eq!(output, "Color { .Red = 0 , .Green = 1 }\n");
    }

    #[test]
    fn test_division_by_zero_aborts() {
        expect_error("fn main() -> i64 { 1 / 0; }");
    }

    #[test]
    fn test_arithmetic_on_strings_aborts() {
        expect_error("fn main() -> i64 { let s: string = \"a\"; s + 1; 0; }");
    }

    #[test]
    fn test_annotated_initialize_checks_runtime_type() {
        expect_error("fn main() -> i64 { let x: string = 1; 0; }");
    }

    #[test]
    fn test_unknown_symbol_aborts() {
        expect_error("fn main() -> i64 { missing; }");
    }

    #[test]
    fn test_unknown_object_type_aborts() {
        expect_error("fn main() -> i64 { let p = Missing { .x = 1 }; 0; }");
    }

    #[test]
    fn test_argument_count_mismatch_aborts() {
        expect_error("fn f(a: i64) -> i64 { a; } fn main() -> i64 { f(1, 2); }");
    }

    #[test]
    fn test_argument_type_mismatch_aborts() {
        expect_error("fn f(a: i64) -> i64 { a; } fn main() -> i64 { f(\"one\"); }");
    }

    #[test]
    fn test_main_must_return_integer() {
        expect_error("fn main() -> i64 { \"done\"; }");
    }

    #[test]
    fn test_missing_main_aborts() {
        expect_error("fn helper() -> i64 { 1; }");
    }

    #[test]
    fn test_missing_field_defaults_to_unknown() {
        let (_, output) = run_capturing(
            "object P { x: i64 y: i64 } \
             fn main() -> i64 { let p: P = P { .x = 1 }; println(p); 0; }",
        );
        assert_eq!(output, "P { .x = 1 , .y = [unknown] }\n");
    }

    #[test]
    fn test_assign_and_read_round_trip() {
        expect_exit(
            "fn main() -> i64 { let x: i64 = 5; x = 6; let y: i64 = x; y; }",
            6,
        );
    }
}
