//! Arithmetic through the gateway's `calculator` tool.

use std::fmt;
use std::str::FromStr;

use gateway::ToolInvoker;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Name of the gateway tool used for arithmetic.
pub const CALCULATOR_TOOL: &str = "calculator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown operation '{0}' (expected add, subtract, multiply or divide)")]
pub struct ParseOperationError(String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "multiply" => Ok(Self::Multiply),
            "divide" => Ok(Self::Divide),
            _ => Err(ParseOperationError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("division by zero is not allowed")]
    DivisionByZero,

    #[error("calculator response has no result field")]
    MissingResult,

    #[error("calculator result is not a number: {0}")]
    InvalidResult(&'static str),

    #[error(transparent)]
    Gateway(#[from] gateway::Error),
}

/// Thin arithmetic client over a [`ToolInvoker`].
#[derive(Debug)]
pub struct Calculator<I> {
    invoker: I,
}

impl<I: ToolInvoker> Calculator<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub async fn add(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.evaluate(Operation::Add, a, b).await
    }

    pub async fn subtract(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.evaluate(Operation::Subtract, a, b).await
    }

    pub async fn multiply(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.evaluate(Operation::Multiply, a, b).await
    }

    /// Fails with [`CalculatorError::DivisionByZero`] without contacting the gateway.
    pub async fn divide(&self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        self.evaluate(Operation::Divide, a, b).await
    }

    pub async fn evaluate(&self, op: Operation, a: f64, b: f64) -> Result<f64, CalculatorError> {
        if op == Operation::Divide && b == 0.0 {
            return Err(CalculatorError::DivisionByZero);
        }

        let mut parameters = Map::new();
        parameters.insert("operation".into(), json!(op.as_str()));
        parameters.insert("a".into(), json!(a));
        parameters.insert("b".into(), json!(b));

        let data = self.invoker.invoke(CALCULATOR_TOOL, &parameters).await?;
        read_result(&data)
    }
}

fn read_result(data: &Value) -> Result<f64, CalculatorError> {
    match data.get("result") {
        None | Some(Value::Null) => Err(CalculatorError::MissingResult),
        Some(Value::Number(n)) => n.as_f64().ok_or(CalculatorError::InvalidResult("number")),
        Some(other) => Err(CalculatorError::InvalidResult(json_type(other))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
