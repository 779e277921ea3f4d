use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

/// A node of the remote computation graph.
///
/// Nodes are immutable and reference-counted: cloning an `Expr` never copies
/// the subtree, and every builder method produces a new node pointing at its
/// inputs. Nothing is evaluated locally.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal JSON value (number, string, list of literals, ...).
    Constant(Value),
    /// A call to a named server-side algorithm.
    Invocation(Arc<Invocation>),
    /// Reference to an argument of an enclosing function definition.
    Argument(String),
    /// A function definition, e.g. the body passed to `Collection.map`.
    Function(Arc<FunctionDef>),
    Array(Vec<Expr>),
    Dictionary(BTreeMap<String, Expr>),
}

#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub function: String,
    pub arguments: BTreeMap<String, Expr>,
}

#[derive(Debug, PartialEq)]
pub struct FunctionDef {
    pub argument_names: Vec<String>,
    pub body: Expr,
}

impl Expr {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    /// Start an invocation of `function`; add arguments with [`Call::arg`].
    pub fn call(function: &str) -> Call {
        Call {
            function: function.to_string(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn function(argument_names: Vec<String>, body: Expr) -> Self {
        Expr::Function(Arc::new(FunctionDef {
            argument_names,
            body,
        }))
    }

    /// Name of the invoked algorithm, if this node is an invocation.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Expr::Invocation(inv) => Some(&inv.function),
            _ => None,
        }
    }

    /// Argument `name` of an invocation node.
    pub fn argument(&self, name: &str) -> Option<&Expr> {
        match self {
            Expr::Invocation(inv) => inv.arguments.get(name),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Expr::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Number of function definitions nested anywhere below (and including)
    /// this node. Used to pick collision-free mapping variable names.
    pub fn function_depth(&self) -> usize {
        match self {
            Expr::Constant(_) | Expr::Argument(_) => 0,
            Expr::Invocation(inv) => inv
                .arguments
                .values()
                .map(Expr::function_depth)
                .max()
                .unwrap_or(0),
            Expr::Function(def) => 1 + def.body.function_depth(),
            Expr::Array(items) => items.iter().map(Expr::function_depth).max().unwrap_or(0),
            Expr::Dictionary(entries) => entries
                .values()
                .map(Expr::function_depth)
                .max()
                .unwrap_or(0),
        }
    }
}

/// Invocation under construction.
#[derive(Debug)]
pub struct Call {
    function: String,
    arguments: BTreeMap<String, Expr>,
}

impl Call {
    pub fn arg(mut self, name: &str, value: impl Into<Expr>) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    pub fn build(self) -> Expr {
        Expr::Invocation(Arc::new(Invocation {
            function: self.function,
            arguments: self.arguments,
        }))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Constant(Value::from(v))
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Constant(Value::from(v))
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Constant(Value::from(v))
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self {
        Expr::Constant(Value::from(v))
    }
}

impl From<String> for Expr {
    fn from(v: String) -> Self {
        Expr::Constant(Value::from(v))
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Constant(v)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }
}
