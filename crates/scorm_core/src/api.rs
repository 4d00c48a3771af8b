//! Standardized runtime API exposed to content.
//!
//! # Responsibility
//! - Expose exactly the eight standardized method names.
//! - Forward each call verbatim to the engine.
//!
//! # Invariants
//! - The facade holds no state and adds no behavior beyond forwarding.
//! - Methods never panic and never return `Result`.

use crate::runtime::engine::DataModelEngine;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Standardized method names, in contract order.
pub const API_METHOD_NAMES: [&str; 8] = [
    "Initialize",
    "Terminate",
    "GetLastError",
    "GetErrorString",
    "GetDiagnostic",
    "GetValue",
    "SetValue",
    "Commit",
];

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors for name-based dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    UnknownMethod(String),
    Arity {
        method: &'static str,
        expected: usize,
        actual: usize,
    },
    InvalidErrorCode(String),
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMethod(name) => write!(f, "unknown API method: {name}"),
            Self::Arity {
                method,
                expected,
                actual,
            } => write!(f, "{method} expects {expected} argument(s), got {actual}"),
            Self::InvalidErrorCode(value) => write!(f, "error code is not an integer: {value}"),
        }
    }
}

impl Error for DispatchError {}

/// Value returned by a dispatched call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReturn {
    Bool(bool),
    Int(i32),
    Str(String),
    /// Blocked write.
    Undefined,
}

impl Display for ApiReturn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// Pass-through facade over one engine.
pub struct ScormApi<'e> {
    engine: &'e mut DataModelEngine,
}

#[allow(non_snake_case)]
impl<'e> ScormApi<'e> {
    pub fn new(engine: &'e mut DataModelEngine) -> Self {
        Self { engine }
    }

    pub fn Initialize(&mut self, param: &str) -> bool {
        self.engine.initialize(param)
    }

    pub fn Terminate(&mut self, param: &str) -> bool {
        self.engine.terminate(param)
    }

    pub fn GetLastError(&self) -> i32 {
        self.engine.get_last_error()
    }

    pub fn GetErrorString(&self, code: i32) -> String {
        self.engine.get_error_string(code).to_string()
    }

    pub fn GetDiagnostic(&self, code: i32) -> String {
        self.engine.get_diagnostic(code).to_string()
    }

    pub fn GetValue(&self, key: &str) -> String {
        self.engine.get_value(key).to_string()
    }

    /// `Some(true)` when performed, `None` when the attempt is read-only.
    pub fn SetValue(&mut self, key: &str, value: &str) -> Option<bool> {
        self.engine.set_value(key, value).as_api_return()
    }

    pub fn Commit(&mut self, param: &str) -> bool {
        self.engine.commit(param)
    }

    /// Routes a call by standardized name with string arguments.
    pub fn dispatch(&mut self, method: &str, args: &[&str]) -> DispatchResult<ApiReturn> {
        match method {
            "Initialize" => {
                let [param] = expect_args::<1>("Initialize", args)?;
                Ok(ApiReturn::Bool(self.Initialize(param)))
            }
            "Terminate" => {
                let [param] = expect_args::<1>("Terminate", args)?;
                Ok(ApiReturn::Bool(self.Terminate(param)))
            }
            "GetLastError" => {
                expect_args::<0>("GetLastError", args)?;
                Ok(ApiReturn::Int(self.GetLastError()))
            }
            "GetErrorString" => {
                let [code] = expect_args::<1>("GetErrorString", args)?;
                Ok(ApiReturn::Str(self.GetErrorString(parse_code(code)?)))
            }
            "GetDiagnostic" => {
                let [code] = expect_args::<1>("GetDiagnostic", args)?;
                Ok(ApiReturn::Str(self.GetDiagnostic(parse_code(code)?)))
            }
            "GetValue" => {
                let [key] = expect_args::<1>("GetValue", args)?;
                Ok(ApiReturn::Str(self.GetValue(key)))
            }
            "SetValue" => {
                let [key, value] = expect_args::<2>("SetValue", args)?;
                Ok(match self.SetValue(key, value) {
                    Some(performed) => ApiReturn::Bool(performed),
                    None => ApiReturn::Undefined,
                })
            }
            "Commit" => {
                let [param] = expect_args::<1>("Commit", args)?;
                Ok(ApiReturn::Bool(self.Commit(param)))
            }
            other => Err(DispatchError::UnknownMethod(other.to_string())),
        }
    }
}

fn expect_args<'a, const N: usize>(
    method: &'static str,
    args: &[&'a str],
) -> DispatchResult<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| DispatchError::Arity {
        method,
        expected: N,
        actual: args.len(),
    })
}

fn parse_code(raw: &str) -> DispatchResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| DispatchError::InvalidErrorCode(raw.to_string()))
}
