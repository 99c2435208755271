//! Tokenizer for the block format

/// Kind of a lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenKind {
    /// Whitespace-delimited word (key, identifier or value)
    Word(String),
    /// `{`
    Open,
    /// `}`
    Close,
    /// `#` up to the end of the line
    Comment,
    /// End of a line
    Newline,
}

/// A token with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Split block-format text into tokens
///
/// Braces are tokens of their own even when glued to a word, so
/// `service{` lexes as `service`, `{`.
#[must_use]
#[inline]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (index, text) in input.lines().enumerate() {
        let line = index + 1;
        let mut word: Option<(usize, String)> = None;

        for (offset, ch) in text.chars().enumerate() {
            let column = offset + 1;
            let kind = match ch {
                '#' => Some(TokenKind::Comment),
                '{' => Some(TokenKind::Open),
                '}' => Some(TokenKind::Close),
                ch if ch.is_whitespace() => None,
                ch => {
                    word.get_or_insert_with(|| (column, String::new())).1.push(ch);
                    continue;
                }
            };

            if let Some((start, buffer)) = word.take() {
                tokens.push(Token {
                    kind: TokenKind::Word(buffer),
                    line,
                    column: start,
                });
            }

            if let Some(kind) = kind {
                let is_comment = kind == TokenKind::Comment;
                tokens.push(Token { kind, line, column });
                if is_comment {
                    break;
                }
            }
        }

        if let Some((start, buffer)) = word.take() {
            tokens.push(Token {
                kind: TokenKind::Word(buffer),
                line,
                column: start,
            });
        }

        tokens.push(Token {
            kind: TokenKind::Newline,
            line,
            column: text.chars().count() + 1,
        });
    }

    tokens
}
