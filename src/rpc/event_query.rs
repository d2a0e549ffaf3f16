//! Event-filter query grammar
//!
//! ```text
//! query     := condition ( "AND" condition )*
//! condition := tag op operand | tag "EXISTS"
//! op        := "=" | "<" | "<=" | ">" | ">=" | "CONTAINS"
//! operand   := 'string' | number | "DATE" yyyy-mm-dd | "TIME" rfc3339
//! ```
//!
//! Tags run until whitespace or one of `\ ( ) " ' = < >`. Quoted strings may
//! not contain quotes. `CONTAINS` takes a quoted string only.

use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Confirmed-transaction events
pub const TX_EVENT_QUERY: &str = "tm.event = 'Tx'";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {pos}")]
pub struct QuerySyntaxError {
    pub pos: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    Exists,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Contains => "CONTAINS",
            Operator::Exists => "EXISTS",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Str(String),
    /// Kept as written; validated as a number when parsed
    Number(String),
    Date(NaiveDate),
    Time(DateTime<FixedOffset>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Str(s) => write!(f, "'{}'", s),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Date(d) => write!(f, "DATE {}", d.format("%Y-%m-%d")),
            Operand::Time(t) => write!(f, "TIME {}", t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub tag: String,
    pub op: Operator,
    /// `None` only for `EXISTS`
    pub operand: Option<Operand>,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.operand {
            Some(operand) => write!(f, "{} {} {}", self.tag, self.op, operand),
            None => write!(f, "{} {}", self.tag, self.op),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub conditions: Vec<Condition>,
}

impl EventQuery {
    pub fn parse(s: &str) -> Result<Self, QuerySyntaxError> {
        Parser { src: s, pos: 0 }.query()
    }
}

impl FromStr for EventQuery {
    type Err = QuerySyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EventQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

fn is_tag_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '\\' | '(' | ')' | '"' | '\'' | '=' | '<' | '>')
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn error(&self, message: impl Into<String>) -> QuerySyntaxError {
        QuerySyntaxError {
            pos: self.pos,
            message: message.into(),
        }
    }

    /// Returns the number of whitespace bytes consumed
    fn skip_ws(&mut self) -> usize {
        let start = self.pos;
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
        self.pos - start
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Keyword followed by whitespace or end of input
    fn eat_keyword(&mut self, kw: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(kw) {
            return false;
        }
        let after = &rest[kw.len()..];
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    fn query(mut self) -> Result<EventQuery, QuerySyntaxError> {
        self.skip_ws();
        if self.at_end() {
            return Err(self.error("empty query"));
        }

        let mut conditions = vec![self.condition()?];
        loop {
            let ws = self.skip_ws();
            if self.at_end() {
                break;
            }
            if ws == 0 || !self.eat_keyword("AND") {
                return Err(self.error("expected AND"));
            }
            if self.skip_ws() == 0 {
                return Err(self.error("expected condition after AND"));
            }
            conditions.push(self.condition()?);
        }

        Ok(EventQuery { conditions })
    }

    fn condition(&mut self) -> Result<Condition, QuerySyntaxError> {
        let tag = self.take_while(is_tag_char);
        if tag.is_empty() {
            return Err(self.error("expected tag"));
        }
        let tag = tag.to_string();
        self.skip_ws();

        let op = self.operator()?;
        if op == Operator::Exists {
            return Ok(Condition { tag, op, operand: None });
        }

        self.skip_ws();
        let operand = self.operand()?;
        if op == Operator::Contains && !matches!(operand, Operand::Str(_)) {
            return Err(self.error("CONTAINS requires a quoted string"));
        }

        Ok(Condition {
            tag,
            op,
            operand: Some(operand),
        })
    }

    fn operator(&mut self) -> Result<Operator, QuerySyntaxError> {
        // two-character operators first
        for (text, op) in [
            ("<=", Operator::Le),
            (">=", Operator::Ge),
            ("=", Operator::Eq),
            ("<", Operator::Lt),
            (">", Operator::Gt),
        ] {
            if self.rest().starts_with(text) {
                self.pos += text.len();
                return Ok(op);
            }
        }
        if self.eat_keyword("CONTAINS") {
            return Ok(Operator::Contains);
        }
        if self.eat_keyword("EXISTS") {
            return Ok(Operator::Exists);
        }
        Err(self.error("expected operator"))
    }

    fn operand(&mut self) -> Result<Operand, QuerySyntaxError> {
        let rest = self.rest();

        if let Some(body) = rest.strip_prefix('\'') {
            let end = body
                .find(['\'', '"'])
                .ok_or_else(|| self.error("unterminated string"))?;
            if body[end..].starts_with('"') {
                return Err(self.error("double quote inside string"));
            }
            self.pos += end + 2;
            return Ok(Operand::Str(body[..end].to_string()));
        }

        if self.eat_keyword("DATE") {
            self.skip_ws();
            let text = self.take_while(|c| !c.is_whitespace());
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|e| self.error(format!("invalid DATE {:?}: {}", text, e)))?;
            return Ok(Operand::Date(date));
        }

        if self.eat_keyword("TIME") {
            self.skip_ws();
            let text = self.take_while(|c| !c.is_whitespace());
            let time = DateTime::parse_from_rfc3339(text)
                .map_err(|e| self.error(format!("invalid TIME {:?}: {}", text, e)))?;
            return Ok(Operand::Time(time));
        }

        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            let text = self.take_while(|c| c.is_ascii_digit() || c == '.');
            let valid = (text == "0" || !text.starts_with('0') || text.starts_with("0."))
                && text.matches('.').count() <= 1
                && text.parse::<f64>().is_ok();
            if !valid {
                return Err(self.error(format!("invalid number {:?}", text)));
            }
            return Ok(Operand::Number(text.to_string()));
        }

        Err(self.error("expected operand"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_event_query() {
        let q = EventQuery::parse(TX_EVENT_QUERY).unwrap();
        assert_eq!(q.conditions.len(), 1);
        assert_eq!(q.conditions[0].tag, "tm.event");
        assert_eq!(q.conditions[0].op, Operator::Eq);
        assert_eq!(q.conditions[0].operand, Some(Operand::Str("Tx".into())));
        assert_eq!(q.to_string(), TX_EVENT_QUERY);
    }

    #[test]
    fn test_compact_form() {
        let q = EventQuery::parse("tm.event='Tx'").unwrap();
        assert_eq!(q.to_string(), "tm.event = 'Tx'");
    }

    #[test]
    fn test_compound_query() {
        let q = EventQuery::parse(
            "tx.height >= 5 AND account.name CONTAINS 'ali' AND tx.time < TIME 2019-04-01T00:00:00Z AND block.date = DATE 2019-04-01 AND tag EXISTS",
        )
        .unwrap();
        assert_eq!(q.conditions.len(), 5);
        assert_eq!(q.conditions[0].op, Operator::Ge);
        assert_eq!(q.conditions[0].operand, Some(Operand::Number("5".into())));
        assert_eq!(q.conditions[1].op, Operator::Contains);
        assert!(matches!(q.conditions[2].operand, Some(Operand::Time(_))));
        assert!(matches!(q.conditions[3].operand, Some(Operand::Date(_))));
        assert_eq!(q.conditions[4].op, Operator::Exists);
        assert!(q.conditions[4].operand.is_none());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "   ",
            "tm.event",
            "tm.event =",
            "tm.event = 'Tx",
            "tm.event = Tx",
            "tm.event = 'Tx' OR a = 1",
            "tm.event = 'Tx' AND",
            "a CONTAINS 5",
            "a = 01",
            "a = 1.2.3",
            "a = DATE 2019-13-01",
            "a = TIME yesterday",
            "= 'x'",
        ] {
            assert!(EventQuery::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }
}
