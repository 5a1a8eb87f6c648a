use crate::codegen::{CCodeGen, CodegenError, Routine};
use crate::surface::ParametricSurface;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_vectors::ExprVector;
use crate::codegen::ccode;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::fs;

fn heart_generator() -> CCodeGen {
    let derivation = ParametricSurface::heart().derive();
    let routines = vec![
        Routine::new("surface", &["u", "v"], derivation.position).unwrap(),
        Routine::new("normal", &["u", "v"], derivation.normal).unwrap(),
    ];
    CCodeGen::new("renderer", "surface", routines).unwrap()
}

#[test]
fn source_defines_two_functions_with_three_outputs() {
    let source = heart_generator().source().unwrap();
    let definition = Regex::new(r"(?m)^void (\w+)\(double u, double v, double \*out\) \{$").unwrap();
    let names: Vec<&str> = definition
        .captures_iter(&source)
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    assert_eq!(names, vec!["surface", "normal"]);

    for body in source.split("void ").skip(1) {
        let outputs = Regex::new(r"(?m)^   out\[(\d)\] = .+;$").unwrap();
        let indices: Vec<&str> = outputs
            .captures_iter(body)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(indices, vec!["0", "1", "2"]);
    }
}

#[test]
fn position_is_emitted_as_written() {
    let source = heart_generator().source().unwrap();
    assert!(source.contains("   out[1] = 8*cos(v);\n"));
    assert!(source.contains("   out[0] = sin(v)*(15*sin(u) - 4*sin(3*u));\n"));
    assert!(source.contains(
        "   out[2] = sin(v)*(15*cos(u) - 5*cos(2*u) - 2*cos(3*u) - cos(4*u));\n"
    ));
}

#[test]
fn source_includes_header_and_math() {
    let source = heart_generator().source().unwrap();
    assert!(source.contains("#include \"surface.h\"\n#include <math.h>\n"));
    assert!(source.contains("sqrt("));
    assert!(!source.contains("inf") && !source.contains("NaN"));
}

#[test]
fn header_has_guard_and_prototypes() {
    let header = heart_generator().header();
    assert!(header.contains("#ifndef RENDERER__SURFACE__H\n#define RENDERER__SURFACE__H\n"));
    assert!(header.contains("void surface(double u, double v, double *out);\n"));
    assert!(header.contains("void normal(double u, double v, double *out);\n"));
    assert!(header.trim_end().ends_with("#endif"));
}

#[test]
fn banner_is_boxed() {
    let generator = heart_generator();
    let banner = generator.banner();
    let lines: Vec<&str> = banner.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| l.chars().count() == 79));
    assert!(lines[3].contains("This file is part of 'renderer'"));
    assert!(generator.source().unwrap().starts_with(&banner));
}

#[test]
fn generation_is_deterministic() {
    let first = heart_generator();
    let second = heart_generator();
    assert_eq!(first.source().unwrap(), second.source().unwrap());
    assert_eq!(first.header(), second.header());
}

#[test]
fn write_files_creates_pair() {
    let dir = tempfile::tempdir().unwrap();
    let generator = heart_generator();
    let paths = generator.write_files(dir.path()).unwrap();
    assert_eq!(paths, vec![dir.path().join("surface.c"), dir.path().join("surface.h")]);
    assert_eq!(fs::read_to_string(&paths[0]).unwrap(), generator.source().unwrap());
    assert_eq!(fs::read_to_string(&paths[1]).unwrap(), generator.header());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn custom_prefix_and_project() {
    let routine = Routine::new("f", &["x"], ExprVector::from_variables(&["x"])).unwrap();
    let generator = CCodeGen::new("my-app", "shape", vec![routine]).unwrap();
    assert_eq!(generator.include_guard(), "MY_APP__SHAPE__H");
    assert!(generator.source().unwrap().contains("#include \"shape.h\""));
}

#[test]
fn invalid_identifiers_are_rejected() {
    let e = ExprVector::from_variables(&["u"]);
    assert!(matches!(
        Routine::new("3d", &["u"], e.clone()),
        Err(CodegenError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        Routine::new("double", &["u"], e.clone()),
        Err(CodegenError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        Routine::new("f", &["u", "u"], e.clone()),
        Err(CodegenError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        Routine::new("f", &["out"], ExprVector::from_variables(&["out"])),
        Err(CodegenError::InvalidIdentifier(_))
    ));
}

#[test]
fn unbound_symbol_is_rejected() {
    let e = ExprVector::from_variables(&["u", "w"]);
    match Routine::new("f", &["u", "v"], e) {
        Err(CodegenError::UnboundSymbol { routine, symbol }) => {
            assert_eq!(routine, "f");
            assert_eq!(symbol, "w");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn duplicate_routine_is_rejected() {
    let e = ExprVector::from_variables(&["u"]);
    let a = Routine::new("f", &["u"], e.clone()).unwrap();
    let b = Routine::new("f", &["u"], e).unwrap();
    assert!(matches!(
        CCodeGen::new("renderer", "surface", vec![a, b]),
        Err(CodegenError::DuplicateRoutine(_))
    ));
}

#[test]
fn non_finite_constant_is_rejected() {
    let e = ExprVector::new(vec![Expr::Var("u".to_string()) * Expr::Const(f64::INFINITY)]);
    let routine = Routine::new("f", &["u"], e).unwrap();
    let generator = CCodeGen::new("renderer", "surface", vec![routine]).unwrap();
    assert!(matches!(generator.source(), Err(CodegenError::NonFiniteConstant(_))));
    let dir = tempfile::tempdir().unwrap();
    assert!(generator.write_files(dir.path()).is_err());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Evaluates the C expressions this crate emits: numbers, `u` and `v`,
/// `+ - * /`, unary minus, parentheses and the `math.h` calls the printer uses.
/// `--` is rejected the way a C lexer would read it, as a decrement.
mod c_eval {
    #[derive(Debug, Clone, PartialEq)]
    enum Token {
        Num(f64),
        Ident(String),
        Op(char),
    }

    fn tokenize(src: &str) -> Result<Vec<Token>, String> {
        if src.contains("--") {
            return Err(format!("decrement operator in `{}`", src));
        }
        let chars: Vec<char> = src.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            if ch.is_whitespace() {
                i += 1;
            } else if ch.is_ascii_digit() || ch == '.' {
                let start = i;
                while i < chars.len() {
                    let c = chars[i];
                    let exponent_sign = (c == '-' || c == '+') && matches!(chars[i - 1], 'e' | 'E');
                    if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|e| format!("{}: {}", text, e))?;
                tokens.push(Token::Num(value));
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            } else if "+-*/(),".contains(ch) {
                tokens.push(Token::Op(ch));
                i += 1;
            } else {
                return Err(format!("unexpected `{}`", ch));
            }
        }
        Ok(tokens)
    }

    struct Parser<'a> {
        tokens: Vec<Token>,
        pos: usize,
        vars: &'a [(&'a str, f64)],
    }

    impl Parser<'_> {
        fn peek(&self) -> Option<&Token> {
            self.tokens.get(self.pos)
        }

        fn eat(&mut self, op: char) -> bool {
            if self.peek() == Some(&Token::Op(op)) {
                self.pos += 1;
                true
            } else {
                false
            }
        }

        fn expect(&mut self, op: char) -> Result<(), String> {
            if self.eat(op) { Ok(()) } else { Err(format!("expected `{}` at {}", op, self.pos)) }
        }

        fn sum(&mut self) -> Result<f64, String> {
            let mut acc = self.product()?;
            loop {
                if self.eat('+') {
                    acc += self.product()?;
                } else if self.eat('-') {
                    acc -= self.product()?;
                } else {
                    return Ok(acc);
                }
            }
        }

        fn product(&mut self) -> Result<f64, String> {
            let mut acc = self.unary()?;
            loop {
                if self.eat('*') {
                    acc *= self.unary()?;
                } else if self.eat('/') {
                    acc /= self.unary()?;
                } else {
                    return Ok(acc);
                }
            }
        }

        fn unary(&mut self) -> Result<f64, String> {
            if self.eat('-') { Ok(-self.unary()?) } else { self.primary() }
        }

        fn primary(&mut self) -> Result<f64, String> {
            let token = self.peek().cloned().ok_or("unexpected end")?;
            self.pos += 1;
            match token {
                Token::Num(value) => Ok(value),
                Token::Op('(') => {
                    let value = self.sum()?;
                    self.expect(')')?;
                    Ok(value)
                }
                Token::Ident(name) if self.eat('(') => {
                    let mut args = vec![self.sum()?];
                    while self.eat(',') {
                        args.push(self.sum()?);
                    }
                    self.expect(')')?;
                    call(&name, &args)
                }
                Token::Ident(name) => self
                    .vars
                    .iter()
                    .find(|(var, _)| *var == name)
                    .map(|(_, value)| *value)
                    .ok_or(format!("unknown variable {}", name)),
                Token::Op(op) => Err(format!("unexpected `{}`", op)),
            }
        }
    }

    fn call(name: &str, args: &[f64]) -> Result<f64, String> {
        let value = match (name, args) {
            ("sin", [x]) => x.sin(),
            ("cos", [x]) => x.cos(),
            ("tan", [x]) => x.tan(),
            ("asin", [x]) => x.asin(),
            ("acos", [x]) => x.acos(),
            ("atan", [x]) => x.atan(),
            ("exp", [x]) => x.exp(),
            ("log", [x]) => x.ln(),
            ("fabs", [x]) => x.abs(),
            ("sqrt", [x]) => x.sqrt(),
            ("pow", [x, y]) => x.powf(*y),
            _ => return Err(format!("unknown call {}/{}", name, args.len())),
        };
        Ok(value)
    }

    pub fn eval(src: &str, vars: &[(&str, f64)]) -> Result<f64, String> {
        let mut parser = Parser { tokens: tokenize(src)?, pos: 0, vars };
        let value = parser.sum()?;
        if parser.pos != parser.tokens.len() {
            return Err(format!("trailing input in `{}`", src));
        }
        Ok(value)
    }
}

fn random_expr(rng: &mut StdRng, depth: u32) -> Expr {
    let var = |name: &str| Expr::Var(name.to_string());
    if depth == 0 || rng.random_range(0..4) == 0 {
        return match rng.random_range(0..4) {
            0 => var("u"),
            1 => var("v"),
            _ => {
                let constants = [-3.0, -1.0, -0.5, 2.0, 0.25, 1.5, 4.0];
                Expr::Const(constants[rng.random_range(0..constants.len())])
            }
        };
    }
    let sub = |rng: &mut StdRng| random_expr(rng, depth - 1);
    match rng.random_range(0..11) {
        0 => sub(rng) + sub(rng),
        1 => sub(rng) - sub(rng),
        2 => sub(rng) * sub(rng),
        3 => sub(rng) / sub(rng),
        4 | 5 => Expr::Const(-1.0) * sub(rng),
        6 => Expr::Const(-2.0) * sub(rng),
        7 => {
            let exponents = [2.0, 0.5, -0.5, -1.0, 3.0];
            let e = exponents[rng.random_range(0..exponents.len())];
            sub(rng).pow(Expr::Const(e))
        }
        8 => Expr::sin(sub(rng).boxed()),
        9 => Expr::cos(sub(rng).boxed()),
        _ => sub(rng).abs(),
    }
}

#[test]
fn printed_c_keeps_value_of_random_trees() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut checked = 0;
    for _ in 0..400 {
        let expr = random_expr(&mut rng, 5);
        let text = ccode(&expr).unwrap();
        assert!(!text.contains("--"), "{} printed as {}", expr, text);
        let (u, v) = (rng.random_range(0.2..2.0), rng.random_range(0.2..2.0));
        let expected = expr.eval_expression(&["u", "v"], &[u, v]).unwrap();
        if !expected.is_finite() || expected.abs() > 1e6 {
            continue;
        }
        let printed = c_eval::eval(&text, &[("u", u), ("v", v)]).unwrap();
        assert_relative_eq!(printed, expected, epsilon = 1e-6, max_relative = 1e-6);
        checked += 1;
    }
    assert!(checked > 100);
}

#[test]
fn nested_negations_stay_valid_c() {
    let u = Expr::Var("u".to_string());
    let cases = [
        -(-u.clone()),
        -Expr::Const(-3.0),
        -(Expr::Const(-2.0) * u.clone()),
        u.clone() - -(-u.clone()),
        u.clone() + -(-(-u.clone())),
    ];
    for expr in cases {
        let text = ccode(&expr).unwrap();
        let expected = expr.eval_expression(&["u"], &[0.7]).unwrap();
        assert_relative_eq!(c_eval::eval(&text, &[("u", 0.7)]).unwrap(), expected);
    }
}

#[test]
fn emitted_normal_is_a_unit_vector_field() {
    let source = heart_generator().source().unwrap();
    let body = source.split("void normal(").nth(1).unwrap();
    let line = Regex::new(r"(?m)^   out\[(\d)\] = (.+);$").unwrap();
    let components: Vec<String> = line
        .captures_iter(body)
        .map(|c| c.get(2).unwrap().as_str().to_string())
        .collect();
    assert_eq!(components.len(), 3);
    assert!(components.iter().all(|c| !c.contains("--")));

    let surface = ParametricSurface::heart();
    let derivation = surface.derive();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let (u, v) = (
            rng.random_range(0.0..std::f64::consts::TAU),
            rng.random_range(0.1..std::f64::consts::PI - 0.1),
        );
        let vars = [("u", u), ("v", v)];
        let n: Vec<f64> = components.iter().map(|c| c_eval::eval(c, &vars).unwrap()).collect();
        let expected = derivation.normal_at(u, v).unwrap();
        let length = n.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert_relative_eq!(length, 1.0, epsilon = 1e-9);
        for i in 0..3 {
            assert_relative_eq!(n[i], expected[i], epsilon = 1e-9);
        }
    }

    let pole = [("u", 0.0), ("v", std::f64::consts::FRAC_PI_2)];
    let n: Vec<f64> = components.iter().map(|c| c_eval::eval(c, &pole).unwrap()).collect();
    assert_relative_eq!(n[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(n[1], 0.0, epsilon = 1e-12);
    assert_relative_eq!(n[2], -1.0, epsilon = 1e-12);
}
