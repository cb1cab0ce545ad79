use clap::Parser;

use c3cd::cli::Cli;
use c3cd::context::GlobalContext;
use c3cd::error::error_exit;
use c3cd::lexer::{print_lex_only, Lexer};
use c3cd::source_loader::{expand_source_names, with_implicit_stdlib_sources};

fn main() {
    let cli = Cli::parse();

    let target = match cli.build_target() {
        Ok(target) => target,
        Err(err) => error_exit(&err.to_string()),
    };

    if cli.lex_only {
        return run_lex_only(&target);
    }
    if cli.parse_only {
        return run_parse_only(&target);
    }

    if let Err(err) = c3cd::driver::run(&target) {
        error_exit(&err.to_string());
    }
}

fn run_lex_only(target: &c3cd::config::BuildTarget) {
    let expanded = match expand_source_names(&target.sources) {
        Ok(paths) => paths,
        Err(err) => error_exit(&err.to_string()),
    };
    let sources = with_implicit_stdlib_sources(target.lib_dir.as_deref(), expanded);
    if sources.is_empty() {
        error_exit(&c3cd::error::DriverError::NoSourceFiles.to_string());
    }

    let mut ctx = GlobalContext::init(target.lib_dir.clone());
    for path in &sources {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => error_exit(&format!("failed to read '{}': {err}", path.display())),
        };
        print_lex_only(&mut ctx, path, &source);
    }
}

fn run_parse_only(target: &c3cd::config::BuildTarget) {
    let expanded = match expand_source_names(&target.sources) {
        Ok(paths) => paths,
        Err(err) => error_exit(&err.to_string()),
    };
    let sources = with_implicit_stdlib_sources(target.lib_dir.as_deref(), expanded);
    if sources.is_empty() {
        error_exit(&c3cd::error::DriverError::NoSourceFiles.to_string());
    }

    let mut ctx = GlobalContext::init(target.lib_dir.clone());
    let default_module_name = ctx.interner.intern("main");
    let mut default_module: Option<c3cd::module::ModuleId> = None;

    for path in &sources {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => error_exit(&format!("failed to read '{}': {err}", path.display())),
        };
        let mut lexer = Lexer::new(&mut ctx, &path.display().to_string(), &source);
        let stream = lexer.tokenize(&mut ctx);

        let fallback_module = if stream.kind(&ctx, 0) == c3cd::token::TokenKind::Module {
            ctx.stdlib_module.expect("stdlib module preregistered by init")
        } else {
            *default_module.get_or_insert_with(|| ctx.find_or_create_module(default_module_name, None))
        };

        let mut parser = c3cd::parser::Parser::new(&stream);
        match parser.parse(&mut ctx, fallback_module) {
            Ok(module) => {
                println!("# {}", path.display());
                for &decl_id in &ctx.module(module).decls {
                    let decl = ctx.decl(decl_id);
                    println!("  {:?} {}", decl.kind, ctx.interner.resolve(decl.name));
                }
            }
            Err(err) => error_exit(&err.to_string()),
        }
    }
}
