//! Log entry formatting for audited calls
//!
//! Entries are plain strings once built. `CallArgs` renders positional
//! arguments as a tuple and keyword arguments as a map so the text stays
//! readable regardless of which operation produced it.

use abacus_types::Number;
use std::fmt;

/// A single positional or keyword argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Number(Number),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            ArgValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<Number> for ArgValue {
    fn from(value: Number) -> Self {
        ArgValue::Number(value)
    }
}

/// Arguments of one audited call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<ArgValue>,
    keyword: Vec<(String, ArgValue)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments of `calculate(operator, *operands)`.
    pub fn for_calculation(operator: &str, operands: &[Number]) -> Self {
        operands
            .iter()
            .fold(Self::new().arg(operator), |args, operand| args.arg(*operand))
    }

    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<ArgValue>) -> Self {
        self.keyword.push((name.to_string(), value.into()));
        self
    }

    /// Positional arguments as a tuple: `('+', 2, 2)`, `(5,)`, `()`.
    pub fn positional_repr(&self) -> String {
        let items: Vec<String> = self.positional.iter().map(ToString::to_string).collect();
        match items.len() {
            1 => format!("({},)", items[0]),
            _ => format!("({})", items.join(", ")),
        }
    }

    /// Keyword arguments as a map: `{}` or `{'precision': 2}`.
    pub fn keyword_repr(&self) -> String {
        let pairs: Vec<String> =
            self.keyword.iter().map(|(name, value)| format!("'{name}': {value}")).collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

/// One formatted line in the operation log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogEntry(String);

impl LogEntry {
    /// `Function: <op> | Args:<args> | Kwargs: <kwargs> | Result: <result>`
    pub fn success(operation: &str, args: &CallArgs, result: &impl fmt::Display) -> Self {
        Self(format!(
            "Function: {operation} | Args:{} | Kwargs: {} | Result: {result}",
            args.positional_repr(),
            args.keyword_repr()
        ))
    }

    /// `Error in function <op>: <error> | Args:<args> | Kwargs: <kwargs>`
    pub fn failure(operation: &str, error: &impl fmt::Display, args: &CallArgs) -> Self {
        Self(format!(
            "Error in function {operation}: {error} | Args:{} | Kwargs: {}",
            args.positional_repr(),
            args.keyword_repr()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LogEntry {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_args() {
        let args = CallArgs::for_calculation("+", &[Number::Integer(2), Number::Float(2.0)]);
        assert_eq!(args.positional_repr(), "('+', 2, 2.0)");
        assert_eq!(args.keyword_repr(), "{}");
    }

    #[test]
    fn test_tuple_edge_cases() {
        assert_eq!(CallArgs::new().positional_repr(), "()");
        assert_eq!(CallArgs::new().arg(Number::Integer(5)).positional_repr(), "(5,)");
        assert_eq!(CallArgs::new().arg("it's").positional_repr(), r"('it\'s',)");
    }

    #[test]
    fn test_keyword_args() {
        let args = CallArgs::new().kwarg("precision", Number::Integer(2)).kwarg("mode", "fast");
        assert_eq!(args.keyword_repr(), "{'precision': 2, 'mode': 'fast'}");
    }

    #[test]
    fn test_entry_formats() {
        let args = CallArgs::for_calculation("+", &[Number::Integer(2), Number::Integer(2)]);
        let ok = LogEntry::success("calculate", &args, &Number::Integer(4));
        assert_eq!(ok.as_str(), "Function: calculate | Args:('+', 2, 2) | Kwargs: {} | Result: 4");

        let err = LogEntry::failure("calculate", &"unknown operator '^'", &args);
        assert_eq!(
            err.to_string(),
            "Error in function calculate: unknown operator '^' | Args:('+', 2, 2) | Kwargs: {}"
        );
    }
}
