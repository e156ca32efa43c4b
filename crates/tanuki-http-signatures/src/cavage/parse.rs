use super::SignatureHeader;
use logos::{Lexer, Logos, Span};
use thiserror::Error;

/// Parse error
#[derive(Debug, Error)]
#[error("Malformed signature header")]
pub struct ParseError;

#[derive(Debug, Logos)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"\w+")]
    Key,

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#)]
    Value,

    #[token(",")]
    Comma,
}

#[derive(Debug)]
struct Token {
    pub ty: TokenTy,
    pub span: Span,
}

impl Token {
    pub fn parse(input: &str) -> impl Iterator<Item = Result<Token, ()>> + '_ {
        Lexer::<'_, TokenTy>::new(input)
            .spanned()
            .map(|(ty, span)| ty.map(|ty| Token { ty, span }))
    }
}

macro_rules! ensure {
    ($self:expr, $value:expr, $pattern:pat) => {{
        let Ok(value) = $value else {
            $self.is_broken = true;
            return Some(Err(()));
        };

        if !matches!(value.ty, $pattern) {
            $self.is_broken = true;
            return Some(Err(()));
        }

        value
    }};
}

struct ParseIter<'a, I> {
    /// Stream of tokens wrapped into a result
    inner: I,

    /// Reference to the original input that was fed to the lexer
    input: &'a str,

    /// Marker whether we encountered any error or illegal token
    ///
    /// If we did, the iterator will stop yielding any results
    is_broken: bool,
}

impl<'a, I> Iterator for ParseIter<'a, I>
where
    I: Iterator<Item = Result<Token, ()>>,
{
    type Item = Result<(&'a str, &'a str), ()>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_broken {
            return None;
        }

        let key = ensure!(self, self.inner.next()?, TokenTy::Key);
        ensure!(self, self.inner.next()?, TokenTy::Equals);
        let value = ensure!(self, self.inner.next()?, TokenTy::Value);

        if let Some(next) = self.inner.next() {
            ensure!(self, next, TokenTy::Comma);
        }

        let key = &self.input[key.span];
        let value = self.input[value.span].trim_matches('"');

        Some(Ok((key, value)))
    }
}

/// Parse a cavage `Signature` header into its components
pub fn parse(
    input: &str,
) -> Result<SignatureHeader<'_, impl Iterator<Item = &str> + Clone, &str>, ParseError> {
    let kv_iter = ParseIter {
        inner: Token::parse(input),
        input,
        is_broken: false,
    };

    let mut key_id = None;
    let mut signature = None;
    let mut headers = None;
    let mut created = None;
    let mut expires = None;

    for kv in kv_iter {
        let (key, value) = kv.map_err(|()| ParseError)?;

        match key {
            "algorithm" => {
                // Discarded. The algorithm is determined by the key, not by
                // what the remote claims in the header.
            }
            "keyId" => key_id = Some(value),
            "signature" => signature = Some(value),
            "headers" => headers = Some(value.split_whitespace()),
            "created" => created = Some(value.parse().map_err(|_| ParseError)?),
            "expires" => expires = Some(value.parse().map_err(|_| ParseError)?),
            _ => return Err(ParseError),
        }
    }

    Ok(SignatureHeader {
        key_id: key_id.ok_or(ParseError)?,
        signature: signature.ok_or(ParseError)?,
        headers: headers.ok_or(ParseError)?,
        created,
        expires,
    })
}

#[cfg(test)]
mod test {
    use super::parse;

    const HEADER: &str = r#"keyId="Test",algorithm="rsa-sha256",headers="(request-target) host date",signature="qdx+H7PHHDZgy4y/Ahn9Tny9V3GP6YgBPyUXMmoxWtLbHpUnXS2mg2+SbrQDMCJypxBLSPQR2aAjn7ndmw2iicw3HMbe8VfEdKFYRqzic+efkb3nndiv/x1xSHDJWeSWkx3ButlYSuBskLu6kd9Fswtemr3lgdDEmn04swr2Os0=""#;

    #[test]
    fn parse_header() {
        let header = parse(HEADER).unwrap();

        assert_eq!(header.created, None);
        assert_eq!(header.expires, None);
        assert_eq!(header.key_id, "Test");
        assert_eq!(header.signature, "qdx+H7PHHDZgy4y/Ahn9Tny9V3GP6YgBPyUXMmoxWtLbHpUnXS2mg2+SbrQDMCJypxBLSPQR2aAjn7ndmw2iicw3HMbe8VfEdKFYRqzic+efkb3nndiv/x1xSHDJWeSWkx3ButlYSuBskLu6kd9Fswtemr3lgdDEmn04swr2Os0=");
        assert_eq!(
            header.headers.collect::<Vec<_>>(),
            ["(request-target)", "host", "date"]
        );
    }

    #[test]
    fn reject_garbage() {
        assert!(parse("keyId=unquoted").is_err());
        assert!(parse(r#"unknown="field""#).is_err());
        assert!(parse(r#"keyId="Test""#).is_err());
    }
}
