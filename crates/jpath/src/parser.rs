//! A `nom`-based parser for address queries.
use super::ast::{CompareOp, FilterExpr, Operand, Query, QueryRoot, Segment, Selector};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, i64 as nom_i64, multispace0},
    combinator::{map, opt, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list1},
    number::complete::double,
    sequence::{delimited, pair, preceded},
};
use serde_json::{Number, Value};

// --- Main Public Parser ---

pub fn parse_query(input: &str) -> Result<Query, JPathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JPathError::Empty);
    }
    match query(trimmed) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rem, _)) => Err(JPathError::QueryParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(JPathError::QueryParse(input.to_string(), e.to_string())),
    }
}

// --- Query Structure ---

fn query(input: &str) -> IResult<&str, Query> {
    map(pair(root, many0(segment)), |(root, segments)| Query {
        root,
        segments,
    })
    .parse(input)
}

fn root(input: &str) -> IResult<&str, QueryRoot> {
    alt((
        value(QueryRoot::Origin, char('$')),
        value(QueryRoot::Current, char('@')),
    ))
    .parse(input)
}

fn segment(input: &str) -> IResult<&str, Segment> {
    alt((descendant_segment, child_segment)).parse(input)
}

fn descendant_segment(input: &str) -> IResult<&str, Segment> {
    map(
        preceded(tag(".."), alt((bracket_selectors, dot_selector))),
        Segment::Descendant,
    )
    .parse(input)
}

fn child_segment(input: &str) -> IResult<&str, Segment> {
    map(
        alt((preceded(char('.'), dot_selector), bracket_selectors)),
        Segment::Child,
    )
    .parse(input)
}

fn dot_selector(input: &str) -> IResult<&str, Vec<Selector>> {
    map(
        alt((
            value(Selector::Wildcard, char('*')),
            map(member_name, Selector::Name),
        )),
        |selector| vec![selector],
    )
    .parse(input)
}

fn bracket_selectors(input: &str) -> IResult<&str, Vec<Selector>> {
    delimited(
        char('['),
        separated_list1(char(','), ws(selector)),
        char(']'),
    )
    .parse(input)
}

// --- Selectors ---

fn selector(input: &str) -> IResult<&str, Selector> {
    alt((
        map(quoted_string, Selector::Name),
        value(Selector::Wildcard, char('*')),
        filter_selector,
        slice_selector, // Must be before index to see the `:`
        map(nom_i64, Selector::Index),
    ))
    .parse(input)
}

fn slice_selector(input: &str) -> IResult<&str, Selector> {
    let (input, start) = opt(nom_i64).parse(input)?;
    let (input, _) = ws(char(':')).parse(input)?;
    let (input, end) = opt(nom_i64).parse(input)?;
    let (input, step) = opt(preceded(ws(char(':')), opt(nom_i64))).parse(input)?;
    Ok((
        input,
        Selector::Slice {
            start,
            end,
            step: step.flatten(),
        },
    ))
}

fn filter_selector(input: &str) -> IResult<&str, Selector> {
    map(preceded(ws(char('?')), or_expr), Selector::Filter).parse(input)
}

// --- Filter Expressions ---

fn or_expr(input: &str) -> IResult<&str, FilterExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("||")), and_expr)).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, next| {
        FilterExpr::Or(Box::new(acc), Box::new(next))
    });
    Ok((input, expr))
}

fn and_expr(input: &str) -> IResult<&str, FilterExpr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(ws(tag("&&")), unary)).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, next| {
        FilterExpr::And(Box::new(acc), Box::new(next))
    });
    Ok((input, expr))
}

fn unary(input: &str) -> IResult<&str, FilterExpr> {
    alt((
        map(preceded(ws(char('!')), unary), |e| {
            FilterExpr::Not(Box::new(e))
        }),
        primary,
    ))
    .parse(input)
}

fn primary(input: &str) -> IResult<&str, FilterExpr> {
    ws(alt((
        delimited(char('('), ws(or_expr), char(')')),
        comparison,
    )))
    .parse(input)
}

fn comparison(input: &str) -> IResult<&str, FilterExpr> {
    let (input, left) = operand(input)?;
    let (input, rhs) = opt(pair(ws(compare_op), operand)).parse(input)?;
    let expr = match (left, rhs) {
        (left, Some((op, right))) => FilterExpr::Compare { left, op, right },
        (Operand::Path(query), None) => FilterExpr::Exists(query),
        (Operand::Literal(v), None) => {
            FilterExpr::Constant(!matches!(v, Value::Null | Value::Bool(false)))
        }
    };
    Ok((input, expr))
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    alt((
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
    ))
    .parse(input)
}

fn operand(input: &str) -> IResult<&str, Operand> {
    alt((map(query, Operand::Path), map(literal, Operand::Literal))).parse(input)
}

// --- Literal Parsers ---

fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Null, tag("null")),
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        map(quoted_string, Value::String),
        number,
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    map(double, |n| {
        if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
            Value::from(n as i64)
        } else {
            Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
        }
    })
    .parse(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('\'' | '"'))) => c,
        _ => return Err(fail(input)),
    };
    let mut out = String::new();
    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c if c == quote => return Ok((&input[pos + c.len_utf8()..], out)),
            c => out.push(c),
        }
    }
    Err(fail(input))
}

/// A dot-notation property name. A backslash escapes the next character, so
/// `a\.b` names the property `a.b`.
fn member_name(input: &str) -> IResult<&str, String> {
    let mut out = String::new();
    let mut end = 0;
    let mut chars = input.char_indices();
    while let Some((pos, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((escaped_pos, escaped)) => {
                    out.push(escaped);
                    end = escaped_pos + escaped.len_utf8();
                    continue;
                }
                None => break,
            }
        }
        if c.is_alphanumeric() || c == '_' || c == '-' || !c.is_ascii() {
            out.push(c);
            end = pos + c.len_utf8();
        } else {
            break;
        }
    }
    if out.is_empty() {
        Err(fail(input))
    } else {
        Ok((&input[end..], out))
    }
}

fn fail(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(input, ErrorKind::Char))
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}
