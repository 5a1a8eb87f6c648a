//! # Symbolic Engine Module
//!
//! The core expression tree of the crate. Every surface, partial derivative and
//! normal field handled by the pipeline is an [`Expr`], built once and then
//! transformed by differentiation, simplification and code emission.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "u", "v"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `Abs`, `sin`, `cos`, `tg`, ... - elementary functions
//!
//! ### Key Methods
//! - `Symbols(symbols: &str)` - create several variables from a comma-separated string
//! - `set_variable()` / `substitute_variable()` - replace a variable by a value or an expression
//! - `variables()` - the set of free variables
//! - `sqrt()`, `abs()`, `pow()` - builders used by the vector algebra
//!
//! Trigonometric functions keep the mathematical notation (tg, ctg, arctg, arcctg).

#![allow(non_camel_case_types)]

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Symbolic expression represented as a tree of boxed nodes.
///
/// # Examples
/// ```rust, ignore
/// use RustedSurface::symbolic::symbolic_engine::Expr;
/// let u = Expr::Var("u".to_string());
/// let expr = Expr::Const(15.0) * Expr::sin(u.boxed());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "u", "v")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// left + right
    Add(Box<Expr>, Box<Expr>),
    /// left - right
    Sub(Box<Expr>, Box<Expr>),
    /// left * right
    Mul(Box<Expr>, Box<Expr>),
    /// left / right
    Div(Box<Expr>, Box<Expr>),
    /// base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// e^x
    Exp(Box<Expr>),
    /// natural logarithm
    Ln(Box<Expr>),
    /// absolute value |x|
    Abs(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// tangent
    tg(Box<Expr>),
    /// cotangent
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// arctangent
    arctg(Box<Expr>),
    /// arccotangent
    arcctg(Box<Expr>),
}

/// Fully parenthesized human-readable form. Also serves as the canonical key
/// used by the simplifier to compare subexpressions.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::Abs(expr) => write!(f, "abs({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// Whitespace is trimmed and empty names are skipped.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("u, v");
    /// assert_eq!(vars.len(), 2);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Rebuilds the node with `f` applied to each direct child.
    pub fn map_children<F>(&self, f: &F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        let un = |e: &Expr| Box::new(f(e));
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(un(lhs), un(rhs)),
            Expr::Sub(lhs, rhs) => Expr::Sub(un(lhs), un(rhs)),
            Expr::Mul(lhs, rhs) => Expr::Mul(un(lhs), un(rhs)),
            Expr::Div(lhs, rhs) => Expr::Div(un(lhs), un(rhs)),
            Expr::Pow(base, exp) => Expr::Pow(un(base), un(exp)),
            Expr::Exp(expr) => Expr::Exp(un(expr)),
            Expr::Ln(expr) => Expr::Ln(un(expr)),
            Expr::Abs(expr) => Expr::Abs(un(expr)),
            Expr::sin(expr) => Expr::sin(un(expr)),
            Expr::cos(expr) => Expr::cos(un(expr)),
            Expr::tg(expr) => Expr::tg(un(expr)),
            Expr::ctg(expr) => Expr::ctg(un(expr)),
            Expr::arcsin(expr) => Expr::arcsin(un(expr)),
            Expr::arccos(expr) => Expr::arccos(un(expr)),
            Expr::arctg(expr) => Expr::arctg(un(expr)),
            Expr::arcctg(expr) => Expr::arcctg(un(expr)),
        }
    }

    /// Direct children of the node, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Const(_) => Vec::new(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::Abs(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => vec![expr.as_ref()],
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_children(&|e: &Expr| e.set_variable(var, value)),
        }
    }

    /// Substitutes several variables at once. Variables absent from the map are kept.
    pub fn set_variable_from_map(&self, var_map: &HashMap<String, f64>) -> Expr {
        match self {
            Expr::Var(name) if var_map.contains_key(name) => Expr::Const(var_map[name]),
            _ => self.map_children(&|e: &Expr| e.set_variable_from_map(var_map)),
        }
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_children(&|e: &Expr| e.substitute_variable(var, expr)),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            _ => self
                .children()
                .iter()
                .any(|child| child.contains_variable(var_name)),
        }
    }

    /// Sorted set of the free variables of the expression.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                vars.insert(name.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_variables(vars);
                }
            }
        }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// e^(self)
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// ln(self)
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// self^rhs
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// self^(1/2)
    pub fn sqrt(self) -> Expr {
        self.pow(Expr::Const(0.5))
    }

    /// |self|
    pub fn abs(self) -> Expr {
        Expr::Abs(self.boxed())
    }

    /// true if expression is Const(0.0)
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// true if expression is Const(1.0)
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    /// Constant value if the node is a constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }
}

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(u, v) -> creates variables u, v
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            let var_names = stringify!($($var),+);
            let vars = $crate::symbolic::symbolic_engine::Expr::Symbols(var_names);
            let mut iter = vars.into_iter();
            ($(
                {
                    let $var = iter.next().unwrap();
                    $var
                }
            ),+)
        }
    };
}
