use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;
use std::fmt;

/// Errors raised while turning an expression into numbers
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// the expression references a variable that is not in the argument list
    UnknownVariable(String),
    /// the argument list names the variable but no value was supplied for it
    MissingValue(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::UnknownVariable(name) => {
                write!(f, "variable '{}' is not among the function arguments", name)
            }
            EvalError::MissingValue(name) => write!(f, "no value supplied for '{}'", name),
        }
    }
}

impl std::error::Error for EvalError {}

/// Compiled numeric function of a slice of arguments
pub type Lambdified = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts the expression into a closure over a slice of arguments.
    ///
    /// Variable positions are resolved once, here, so the returned closure does
    /// no name lookups. The closure expects `args` ordered like `vars`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let u = Expr::Var("u".to_string());
    /// let f = u.pow(Expr::Const(2.0)); // u^2
    /// let func = f.lambdify(&["u"]).unwrap();
    /// assert_eq!(func(&[3.0]), 9.0);
    /// ```
    pub fn lambdify(&self, vars: &[&str]) -> Result<Lambdified, EvalError> {
        let compiled: Lambdified = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&x| x == name)
                    .ok_or_else(|| EvalError::UnknownVariable(name.clone()))?;
                Box::new(move |args| args[index])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) + rf(args))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) - rf(args))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) * rf(args))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) / rf(args))
            }
            Expr::Pow(b, e) => match e.as_ref() {
                Expr::Const(p) if *p == 0.5 => {
                    let bf = b.lambdify(vars)?;
                    Box::new(move |args| bf(args).sqrt())
                }
                Expr::Const(p) if p.fract() == 0.0 && p.abs() <= i32::MAX as f64 => {
                    let bf = b.lambdify(vars)?;
                    let n = *p as i32;
                    Box::new(move |args| bf(args).powi(n))
                }
                _ => {
                    let bf = b.lambdify(vars)?;
                    let ef = e.lambdify(vars)?;
                    Box::new(move |args| bf(args).powf(ef(args)))
                }
            },
            Expr::Exp(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).exp())
            }
            Expr::Ln(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).ln())
            }
            Expr::Abs(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).abs())
            }
            Expr::sin(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).sin())
            }
            Expr::cos(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).cos())
            }
            Expr::tg(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).tan())
            }
            Expr::ctg(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| 1.0 / f(args).tan())
            }
            Expr::arcsin(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).asin())
            }
            Expr::arccos(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).acos())
            }
            Expr::arctg(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).atan())
            }
            Expr::arcctg(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| (PI / 2.0) - f(args).atan())
            }
        };
        Ok(compiled)
    } // end of lambdify

    /// Closure of two arguments, the shape every surface routine has.
    pub fn lambdify2D(
        &self,
        x: &str,
        y: &str,
    ) -> Result<Box<dyn Fn(f64, f64) -> f64 + Send + Sync>, EvalError> {
        let compiled = self.lambdify(&[x, y])?;
        Ok(Box::new(move |a, b| compiled(&[a, b])))
    }
}
