//! Recursive descent markup parser.
//!
//! Parses element/attribute markup into a [`NodeSpec`] tree. Elements carry
//! attributes and child elements only; text content is rejected. Uses the
//! logos-based tokenizer from [`crate::markup::tokenizer`].

use logos::Logos;

use crate::document::{NodeSpec, Value};
use crate::markup::tokenizer::{strip_comments, Token};

/// Errors from markup parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("closing tag </{found}> does not match <{expected}>")]
    MismatchedClose { expected: String, found: String },
    #[error("document has no <{0}> root element")]
    MissingRoot(String),
    #[error("unknown entity &{0};")]
    InvalidEntity(String),
}

/// A token with its byte offset in the (comment-stripped) source.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    position: usize,
}

/// Tokenize input using logos, failing on the first character that does not
/// lex.
fn tokenize_with_spans(input: &str) -> Result<Vec<PToken>, ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => tokens.push(PToken { token, text: input[span.clone()].to_string(), position: span.start }),
            Err(()) => {
                return Err(ParseError::UnexpectedToken {
                    position: span.start,
                    message: format!("unexpected character {:?}", &input[span]),
                })
            }
        }
    }
    Ok(tokens)
}

/// Parse markup containing exactly one root element.
pub fn parse(input: &str) -> Result<NodeSpec, ParseError> {
    let cleaned = strip_comments(input);
    let tokens = tokenize_with_spans(&cleaned)?;
    let mut parser = Parser { tokens, cursor: 0 };

    if parser.is_eof() {
        return Err(ParseError::UnexpectedEof("expected a root element".into()));
    }
    let root = parser.parse_element()?;
    if let Some(tok) = parser.peek() {
        return Err(ParseError::UnexpectedToken {
            position: tok.position,
            message: format!("content after the root element: '{}'", tok.text),
        });
    }
    Ok(root)
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<&PToken> {
        let tok = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(tok)
    }

    fn expect(&mut self, expected: &Token) -> Result<PToken, ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok.clone()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.position,
                message: format!("expected {:?}, got {:?} '{}'", expected, tok.token, tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    /// `<Name attr="value" ...>children</Name>` or `<Name .../>`.
    fn parse_element(&mut self) -> Result<NodeSpec, ParseError> {
        self.expect(&Token::TagOpen)?;
        let name = self.expect(&Token::Name)?.text;
        let mut spec = NodeSpec::new(name.clone());

        while self.peek().is_some_and(|t| t.token == Token::Name) {
            let (attribute, value) = self.parse_attribute()?;
            if spec.data.has_property(&attribute) {
                log::debug!("duplicate attribute {attribute:?} on <{name}>, keeping the last");
            }
            spec.data.set_property(attribute, value);
        }

        match self.advance().cloned() {
            Some(PToken { token: Token::SelfClose, .. }) => return Ok(spec),
            Some(PToken { token: Token::TagClose, .. }) => {}
            Some(tok) => {
                return Err(ParseError::UnexpectedToken {
                    position: tok.position,
                    message: format!("expected '>' or '/>' in <{name}>, got '{}'", tok.text),
                })
            }
            None => return Err(ParseError::UnexpectedEof(format!("unterminated <{name}>"))),
        }

        loop {
            match self.peek().map(|t| t.token.clone()) {
                Some(Token::TagOpen) => spec.children.push(self.parse_element()?),
                Some(Token::CloseTagOpen) => {
                    self.advance();
                    let closing = self.expect(&Token::Name)?.text;
                    if closing != name {
                        return Err(ParseError::MismatchedClose { expected: name, found: closing });
                    }
                    self.expect(&Token::TagClose)?;
                    return Ok(spec);
                }
                Some(_) => {
                    let tok = self.peek().cloned();
                    let (position, text) = tok.map(|t| (t.position, t.text)).unwrap_or_default();
                    return Err(ParseError::UnexpectedToken {
                        position,
                        message: format!("text content is not supported inside <{name}>: '{text}'"),
                    });
                }
                None => return Err(ParseError::UnexpectedEof(format!("missing </{name}>"))),
            }
        }
    }

    /// `name="value"` or `name='value'`.
    fn parse_attribute(&mut self) -> Result<(String, Value), ParseError> {
        let name = self.expect(&Token::Name)?.text;
        self.expect(&Token::Equals)?;
        match self.advance().cloned() {
            Some(tok) if matches!(tok.token, Token::DoubleQuoted | Token::SingleQuoted) => {
                let raw = &tok.text[1..tok.text.len() - 1];
                Ok((name, Value::String(decode_entities(raw)?)))
            }
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.position,
                message: format!("expected a quoted value for {name:?}, got '{}'", tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("missing value for {name:?}"))),
        }
    }
}

/// Replace `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and numeric character
/// references.
fn decode_entities(raw: &str) -> Result<String, ParseError> {
    if !raw.contains('&') {
        return Ok(raw.to_owned());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err(ParseError::InvalidEntity(after.to_owned()));
        };
        let entity = &after[..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => numeric_entity(entity),
        };
        match decoded {
            Some(c) => out.push(c),
            None => return Err(ParseError::InvalidEntity(entity.to_owned())),
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_nested_elements() {
        let spec = parse(
            r#"<View display="tabbed">
                 <Slider id="gain" class="knob"/>
                 <View><Dummy/></View>
               </View>"#,
        )
        .unwrap();
        assert_eq!(
            spec,
            NodeSpec::new("View")
                .with_property("display", "tabbed")
                .with_child(NodeSpec::new("Slider").with_id("gain").with_property("class", "knob"))
                .with_child(NodeSpec::new("View").with_child(NodeSpec::new("Dummy")))
        );
    }

    #[test]
    fn attribute_order_is_kept() {
        let spec = parse(r#"<a z="1" b="2" m="3"/>"#).unwrap();
        let names: Vec<&str> = spec.data.properties().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "b", "m"]);
    }

    #[test]
    fn skips_declaration_and_comments() {
        let spec = parse("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- c --><magic><!-- x --></magic>").unwrap();
        assert_eq!(spec, NodeSpec::new("magic"));
    }

    #[test]
    fn decodes_entities() {
        let spec = parse(r#"<a t="a &amp; b &lt;c&gt; &quot;d&quot; &#65;&#x42;"/>"#).unwrap();
        assert_eq!(spec.data.property("t"), Some(&Value::from("a & b <c> \"d\" AB")));
    }

    #[test]
    fn unknown_entity() {
        assert_eq!(parse(r#"<a t="&nbsp;"/>"#), Err(ParseError::InvalidEntity("nbsp".into())));
    }

    #[test]
    fn mismatched_close() {
        assert_eq!(
            parse("<View><Slider></View>"),
            Err(ParseError::MismatchedClose { expected: "Slider".into(), found: "View".into() })
        );
    }

    #[test]
    fn unterminated_element() {
        assert!(matches!(parse("<View>"), Err(ParseError::UnexpectedEof(_))));
        assert!(matches!(parse(""), Err(ParseError::UnexpectedEof(_))));
    }

    #[test]
    fn rejects_text_content() {
        assert!(matches!(parse("<a>hello</a>"), Err(ParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn rejects_unquoted_values() {
        assert!(matches!(parse("<a b=c/>"), Err(ParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn rejects_second_root() {
        assert!(matches!(parse("<a/><b/>"), Err(ParseError::UnexpectedToken { .. })));
    }
}
