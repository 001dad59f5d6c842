//! Capability-scoped expression evaluator
//!
//! The workbench terminal evaluates user expressions. Arbitrary code
//! execution is deliberately not offered: the trait scopes what an evaluator
//! may do, and the built-in implementation is a pure arithmetic interpreter
//! with no ambient authority (no I/O, no process access).

/// Result shape of one evaluation: a value or an error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    Value(String),
    Error(String),
}

/// An expression evaluator
///
/// Implementations receive text and return an outcome; they hold only the
/// capabilities they were constructed with.
pub trait Evaluator {
    fn eval(&self, input: &str) -> EvalOutcome;
}

/// Arithmetic expression evaluator
///
/// Numbers, `+ - * / %`, unary minus, and parentheses.
#[derive(Debug, Default)]
pub struct ExprEvaluator;

impl Evaluator for ExprEvaluator {
    fn eval(&self, input: &str) -> EvalOutcome {
        let mut parser = Parser::new(input);
        match parser.parse() {
            Ok(value) => EvalOutcome::Value(format_number(value)),
            Err(message) => EvalOutcome::Error(message),
        }
    }
}

/// Format a result the way a REPL would: integers without a fraction
fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Result<f64, String> {
        let value = self.expression()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(format!(
                "Unexpected character '{}' at position {}",
                self.input[self.pos] as char, self.pos
            ));
        }
        Ok(value)
    }

    fn expression(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                Some(b'%') => {
                    self.pos += 1;
                    value %= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, String> {
        self.skip_whitespace();
        if self.peek() == Some(b'-') {
            self.pos += 1;
            return Ok(-self.unary()?);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<f64, String> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.expression()?;
                self.skip_whitespace();
                if self.peek() != Some(b')') {
                    return Err("Expected closing parenthesis".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) => Err(format!(
                "Unexpected character '{}' at position {}",
                c as char, self.pos
            )),
            None => Err("Unexpected end of expression".to_string()),
        }
    }

    fn number(&mut self) -> Result<f64, String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.') {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| "Invalid number".to_string())?;
        text.parse::<f64>()
            .map_err(|_| format!("Invalid number '{}'", text))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}
