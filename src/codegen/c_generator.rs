use crate::codegen::CodegenError;
use crate::codegen::c_printer::ccode;
use crate::symbolic::symbolic_vectors::ExprVector;
use itertools::Itertools;
use log::{debug, info};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// name of the output pointer every generated function writes to
pub const OUTPUT_ARGUMENT: &str = "out";

const BANNER_WIDTH: usize = 78;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

const C_KEYWORDS: [&str; 37] = [
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool", "_Complex", "_Imaginary",
];

fn check_identifier(name: &str) -> Result<(), CodegenError> {
    if IDENTIFIER.is_match(name) && !C_KEYWORDS.contains(&name) && name != OUTPUT_ARGUMENT {
        Ok(())
    } else {
        Err(CodegenError::InvalidIdentifier(name.to_string()))
    }
}

/// A named vector function of scalar arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub name: String,
    pub arguments: Vec<String>,
    pub expressions: ExprVector,
}

impl Routine {
    /// Checks the names and that every free symbol of `expressions` is an argument.
    pub fn new(name: &str, arguments: &[&str], expressions: ExprVector) -> Result<Self, CodegenError> {
        check_identifier(name)?;
        let mut seen = HashSet::new();
        for arg in arguments {
            check_identifier(arg)?;
            if !seen.insert(*arg) || *arg == name {
                return Err(CodegenError::InvalidIdentifier(arg.to_string()));
            }
        }
        for expr in expressions.iter() {
            if let Some(symbol) = expr.variables().into_iter().find(|s| !seen.contains(s.as_str())) {
                return Err(CodegenError::UnboundSymbol {
                    routine: name.to_string(),
                    symbol,
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            expressions,
        })
    }

    /// `void name(double a, double b, double *out)`
    pub fn prototype(&self) -> String {
        let args = self
            .arguments
            .iter()
            .map(|a| format!("double {}", a))
            .chain(std::iter::once(format!("double *{}", OUTPUT_ARGUMENT)))
            .join(", ");
        format!("void {}({})", self.name, args)
    }

    pub fn definition(&self) -> Result<String, CodegenError> {
        let mut code = format!("{} {{\n\n", self.prototype());
        for (i, expr) in self.expressions.iter().enumerate() {
            code.push_str(&format!("   {}[{}] = {};\n", OUTPUT_ARGUMENT, i, ccode(expr)?));
        }
        code.push_str("\n}\n");
        Ok(code)
    }
}

/// Generator of one `.c`/`.h` pair holding a set of routines.
#[derive(Debug, Clone)]
pub struct CCodeGen {
    pub project: String,
    pub prefix: String,
    pub routines: Vec<Routine>,
}

impl CCodeGen {
    pub fn new(project: &str, prefix: &str, routines: Vec<Routine>) -> Result<Self, CodegenError> {
        let mut names = HashSet::new();
        for routine in &routines {
            if !names.insert(routine.name.as_str()) {
                return Err(CodegenError::DuplicateRoutine(routine.name.clone()));
            }
        }
        Ok(Self {
            project: project.to_string(),
            prefix: prefix.to_string(),
            routines,
        })
    }

    pub fn header_name(&self) -> String {
        format!("{}.h", self.prefix)
    }

    pub fn source_name(&self) -> String {
        format!("{}.c", self.prefix)
    }

    /// Boxed comment placed at the top of both files.
    pub fn banner(&self) -> String {
        let inner = BANNER_WIDTH - 2;
        let lines = [
            format!("Code generated with {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            String::new(),
            format!("This file is part of '{}'", self.project),
        ];
        let mut banner = format!("/{}\n", "*".repeat(BANNER_WIDTH));
        for line in lines {
            banner.push_str(&format!(" *{:^width$}*\n", line, width = inner));
        }
        banner.push_str(&format!(" {}/\n", "*".repeat(BANNER_WIDTH - 1)));
        banner
    }

    /// `PROJECT__PREFIX__H` with every non-identifier character replaced by `_`
    pub fn include_guard(&self) -> String {
        let clean = |s: &str| {
            s.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                .collect::<String>()
        };
        format!("{}__{}__H", clean(&self.project), clean(&self.prefix))
    }

    pub fn header(&self) -> String {
        let guard = self.include_guard();
        let prototypes = self
            .routines
            .iter()
            .map(|r| format!("{};\n", r.prototype()))
            .join("");
        format!(
            "{}\n#ifndef {guard}\n#define {guard}\n\n{}\n#endif\n\n",
            self.banner(),
            prototypes,
            guard = guard
        )
    }

    pub fn source(&self) -> Result<String, CodegenError> {
        let mut code = self.banner();
        code.push_str(&format!("#include \"{}\"\n#include <math.h>\n\n", self.header_name()));
        for routine in &self.routines {
            code.push_str(&routine.definition()?);
            code.push('\n');
        }
        Ok(code)
    }

    /// Writes `<prefix>.c` and `<prefix>.h` into `dir`, returning their paths.
    pub fn write_files(&self, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let source = self.source()?;
        let header = self.header();
        fs::create_dir_all(dir)?;

        let source_path = dir.join(self.source_name());
        let header_path = dir.join(self.header_name());
        fs::write(&source_path, &source)?;
        debug!("{} bytes written to {}", source.len(), source_path.display());
        fs::write(&header_path, &header)?;
        info!(
            "generated {} routine(s) into {} and {}",
            self.routines.len(),
            source_path.display(),
            header_path.display()
        );
        Ok(vec![source_path, header_path])
    }
}
