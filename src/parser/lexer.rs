use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Equals,
    Or,
    // A run of unquoted symbols
    Symbols(String),
    // Symbols written inside double quotes
    Quoted(String)
}

fn is_special(c: char) -> bool {
    c == '=' || c == '|' || c == '\"'
}

pub fn lex_quoted(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume open quote
    let token_text = line.peeking_take_while(|&c| c != '\"').collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != Some('\"') {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    Ok(Token::Quoted(token_text))
}

pub fn lex_symbols(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Symbols(line.peeking_take_while(|&c| !c.is_whitespace() && !is_special(c)).collect()))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if *c == '\"' {
            tokens.push(lex_quoted(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_symbols(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn symbols(text: &str) -> Token {
        Token::Symbols(text.to_string())
    }

    #[test]
    fn lex_normal_quoted() {
        let lines = vec![
            "\"a=b\" cB",
            "\" \"",
            "\"|\"\"x\""
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (Token::Quoted("a=b".to_string()), " cB"),
            (Token::Quoted(" ".to_string()), ""),
            (Token::Quoted("|".to_string()), "\"x\"")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_quoted(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_mismatched_quote() {
        for line in ["\"welcome", "\"aB | b"] {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_quoted(&mut chars).unwrap_err(), CompileErrorType::UnmatchedQuote);
        }
    }

    #[test]
    fn lex_symbols_stops_at_specials() {
        let lines = vec!["aB cD", "aB|b", "S=aB", "ab\"c\""];
        let answers = vec![
            (symbols("aB"), " cD"),
            (symbols("aB"), "|b"),
            (symbols("S"), "=aB"),
            (symbols("ab"), "\"c\"")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_symbols(&mut chars).unwrap(), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S = aB | b",
            "E=(E)T|n\"=\""
        ];
        let answers = vec![
            vec![symbols("S"), Token::Equals, symbols("aB"), Token::Or, symbols("b")],
            vec![
                symbols("E"),
                Token::Equals,
                symbols("(E)T"),
                Token::Or,
                symbols("n"),
                Token::Quoted("=".to_string())
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }
}
