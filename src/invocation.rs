//! Export invocations: which function to call, with what, and how the
//! outcome is printed.

use std::fmt;

use serde::Deserialize;
use wasmtime::{Val, ValType};

/// Largest integer magnitudes that convert to a float without rounding.
const F32_EXACT_INT: u64 = 1 << 24;
const F64_EXACT_INT: u64 = 1 << 53;

/// A literal argument as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Float(f64),
}

impl Arg {
    /// Convert to an engine value of the given parameter type.
    /// Returns None when the literal does not fit the type.
    pub fn to_val(self, ty: &ValType) -> Option<Val> {
        match (self, ty) {
            (Self::Int(v), ValType::I32) => i32::try_from(v).ok().map(Val::I32),
            (Self::Int(v), ValType::I64) => Some(Val::I64(v)),
            (Self::Int(v), ValType::F32) if v.unsigned_abs() <= F32_EXACT_INT => {
                Some(Val::F32((v as f32).to_bits()))
            }
            (Self::Int(v), ValType::F64) if v.unsigned_abs() <= F64_EXACT_INT => {
                Some(Val::F64((v as f64).to_bits()))
            }
            (Self::Float(v), ValType::F32) => Some(Val::F32((v as f32).to_bits())),
            (Self::Float(v), ValType::F64) => Some(Val::F64(v.to_bits())),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One export call: `{export, args}` with an optional display label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Invocation {
    /// Name of the exported function.
    pub export: String,
    /// Name printed in the result line (defaults to `export`).
    #[serde(default)]
    pub label: Option<String>,
    /// Ordered arguments.
    #[serde(default)]
    pub args: Vec<Arg>,
}

impl Invocation {
    pub fn new(export: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            export: export.into(),
            label: None,
            args,
        }
    }

    pub fn labelled(label: impl Into<String>, export: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            export: export.into(),
            label: Some(label.into()),
            args,
        }
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.export)
    }
}

/// The two calls made when no invocation file is configured.
pub fn default_invocations() -> Vec<Invocation> {
    vec![
        Invocation::labelled("sum", "add", vec![Arg::Int(6), Arg::Int(27)]),
        Invocation::new("multiple", vec![Arg::Int(6), Arg::Int(27)]),
    ]
}

/// Outcome of a successful call, rendered as `name(a, b) = r`.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub name: String,
    pub args: Vec<Arg>,
    pub results: Vec<Val>,
}

impl fmt::Display for InvocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(") = ")?;
        match self.results.as_slice() {
            [] => f.write_str("()"),
            results => {
                for (i, val) in results.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_val(f, val)?;
                }
                Ok(())
            }
        }
    }
}

fn write_val(f: &mut fmt::Formatter<'_>, val: &Val) -> fmt::Result {
    match val {
        Val::I32(v) => write!(f, "{v}"),
        Val::I64(v) => write!(f, "{v}"),
        Val::F32(bits) => write!(f, "{}", f32::from_bits(*bits)),
        Val::F64(bits) => write!(f, "{}", f64::from_bits(*bits)),
        _ => f.write_str("<ref>"),
    }
}
