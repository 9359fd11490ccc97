use std::fs;

use owo_colors::OwoColorize;

use flint_interpreter::Interpreter;

fn print_diagnostics(header: &str, errors: &[String]) {
    eprintln!("{}", header.red().bold());
    for e in errors {
        eprintln!("{}", e);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1) {
        Some(p) => p,
        None => {
            println!("Input source file.");
            std::process::exit(1);
        }
    };

    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            println!("Unable to read file.");
            std::process::exit(1);
        }
    };

    let (mut lib, parse_errors) = flint_parser::parse(&src);
    if !parse_errors.is_empty() {
        print_diagnostics("Parse errors:", &parse_errors);
    }
    if lib.functions.is_empty() {
        println!("Unable to parse AST.");
        std::process::exit(1);
    }

    // type errors are reported but do not stop execution
    let type_errors = flint_checker::check(&mut lib);
    if !type_errors.is_empty() {
        print_diagnostics("Type errors:", &type_errors);
    }

    let mut interpreter = Interpreter::new();
    match interpreter.run(&lib) {
        Ok(result) => std::process::exit(result as i32),
        Err(e) => {
            eprintln!("{}", "Runtime error:".red().bold());
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
