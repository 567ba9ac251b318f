//! Compilation driver and pipeline orchestration

use crate::common::CompileResult;
use crate::frontend::{parse, prepare_global_scope, semantic_check, Ast, FrontendConfig, Lexer, Scope};

/// Frontend pipeline over a prepared global scope.
///
/// Each compilation checks against its own copy of the global scope, so
/// one pipeline can compile any number of programs.
pub struct Pipeline {
    global: Scope,
    config: FrontendConfig,
}

impl Pipeline {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            global: Scope::new(),
            config,
        }
    }

    /// Pipeline whose global scope is preloaded from `bootstrap`
    pub fn with_bootstrap(bootstrap: &str, config: FrontendConfig) -> CompileResult<Self> {
        if config.verbose {
            eprintln!("Preparing global scope...");
        }
        let global = prepare_global_scope(bootstrap)?;
        Ok(Self { global, config })
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    /// Parse `source` without semantic analysis
    pub fn parse(&self, source: &str) -> CompileResult<Ast> {
        if self.config.dump_tokens {
            let tokens = Lexer::new(source).tokenize_all()?;
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("{:?}", token);
            }
            eprintln!("=== End Tokens ===\n");
        }

        if self.config.verbose {
            eprintln!("Parsing...");
        }
        let ast = parse(source)?;

        if self.config.dump_ast {
            eprintln!("=== AST ===");
            for line in ast.dump() {
                eprintln!("{}", line);
            }
            eprintln!("=== End AST ===\n");
        }

        Ok(ast)
    }

    /// Parse and check `source`, returning the annotated tree
    pub fn compile(&self, source: &str) -> CompileResult<Ast> {
        let mut ast = self.parse(source)?;

        if self.config.verbose {
            eprintln!("Analyzing...");
        }
        let mut scope = self.global.clone();
        semantic_check(&mut ast, &mut scope)?;

        Ok(ast)
    }

    /// Annotated tree dump of `source`
    pub fn dump(&self, source: &str) -> CompileResult<Vec<String>> {
        Ok(self.compile(source)?.dump())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FrontendConfig::default())
    }
}
