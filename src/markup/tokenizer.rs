//! logos-based markup tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `</` as [`Token::CloseTagOpen`] beats `<`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Comments and processing instructions are removed before lexing, see
//! [`strip_comments`].

use logos::Logos;

/// Markup token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// `</`
    #[token("</")]
    CloseTagOpen,

    /// `/>`
    #[token("/>")]
    SelfClose,

    /// Double-quoted attribute value.
    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    /// Single-quoted attribute value.
    #[regex(r"'[^']*'")]
    SingleQuoted,

    /// Element or attribute name: `View`, `flex-grow`, `xml:lang`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_:.\-]*")]
    Name,

    // ── Single-character punctuation ─────────────────────────────────

    /// `<`
    #[token("<")]
    TagOpen,

    /// `>`
    #[token(">")]
    TagClose,

    /// `=`
    #[token("=")]
    Equals,
}

/// Tokenize markup into `(Token, text)` pairs, dropping anything that does
/// not lex.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}

/// Remove `<!-- ... -->` comments and `<? ... ?>` processing instructions,
/// replacing each with a single space. An unterminated one consumes the rest
/// of the input.
pub fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    loop {
        let comment = rest.find("<!--").map(|at| (at, "-->"));
        let instruction = rest.find("<?").map(|at| (at, "?>"));
        let next = match (comment, instruction) {
            (Some(c), Some(i)) => Some(if c.0 < i.0 { c } else { i }),
            (c, i) => c.or(i),
        };
        let Some((start, terminator)) = next else {
            result.push_str(rest);
            break;
        };

        result.push_str(&rest[..start]);
        result.push(' ');
        let body = &rest[start + 2..];
        match body.find(terminator) {
            Some(end) => rest = &body[end + terminator.len()..],
            None => break,
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: tokenize and return just the token variants.
    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokens("< </ > /> ="),
            vec![Token::TagOpen, Token::CloseTagOpen, Token::TagClose, Token::SelfClose, Token::Equals]
        );
    }

    #[test]
    fn test_element_with_attributes() {
        assert_eq!(
            tokenize(r#"<Slider flex-grow="2" class='knob'/>"#),
            vec![
                (Token::TagOpen, "<".into()),
                (Token::Name, "Slider".into()),
                (Token::Name, "flex-grow".into()),
                (Token::Equals, "=".into()),
                (Token::DoubleQuoted, "\"2\"".into()),
                (Token::Name, "class".into()),
                (Token::Equals, "=".into()),
                (Token::SingleQuoted, "'knob'".into()),
                (Token::SelfClose, "/>".into()),
            ]
        );
    }

    #[test]
    fn quoted_values_span_lines() {
        assert_eq!(tokens("\"a\nb\""), vec![Token::DoubleQuoted]);
    }

    #[test]
    fn strip_comments_basic() {
        assert_eq!(strip_comments("<a/><!-- note --><b/>"), "<a/> <b/>");
    }

    #[test]
    fn strip_declaration_and_comment() {
        assert_eq!(strip_comments("<?xml version=\"1.0\"?>\n<!-- x --><a/>"), " \n <a/>");
    }

    #[test]
    fn strip_comments_unterminated() {
        assert_eq!(strip_comments("<a/><!-- open"), "<a/> ");
    }

    #[test]
    fn strip_keeps_unicode() {
        assert_eq!(strip_comments("<a t=\"Größe\"/>"), "<a t=\"Größe\"/>");
    }
}
