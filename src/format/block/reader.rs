//! Reader for the block format (`aerospike.conf`)
//!
//! A small state machine drives the token stream:
//!
//! - `LineStart` / `InSectionBody`: at the start of a line, outside or
//!   inside a section.
//! - `InAssignment`: a key was read, collecting its values.
//! - `ExpectBrace`: a key with at most one identifier ended its line; a `{`
//!   on the next significant line makes it an opener, anything else commits
//!   it as an assignment.
//! - `InComment`: skipping a comment, resuming the previous state at the
//!   end of the line.
//! - `Error`: terminal.

use super::lexer::{Token, TokenKind, tokenize};
use crate::error::AsconfigError;
use crate::model::{NAME_KEY, Scalar, Section, TYPE_KEY, Value};
use crate::normalize::keys;
use crate::schema::hints::{TypeHints, type_token};
use serde_json::Value as Json;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LineStart,
    InAssignment,
    ExpectBrace,
    InSectionBody,
    InComment,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Section,
    Logging,
    LoggingSink,
}

/// A section being built
struct Frame<'h> {
    kind: FrameKind,
    key: String,
    identifier: Option<String>,
    line: usize,
    column: usize,
    section: Section,
    /// Completed logging sinks, only used by `FrameKind::Logging`
    sinks: Vec<Section>,
    schema: Option<&'h Json>,
}

impl<'h> Frame<'h> {
    fn new(
        kind: FrameKind,
        key: String,
        identifier: Option<String>,
        position: (usize, usize),
        schema: Option<&'h Json>,
    ) -> Self {
        Self {
            kind,
            key,
            identifier,
            line: position.0,
            column: position.1,
            section: Section::new(),
            sinks: Vec::new(),
            schema,
        }
    }
}

/// A key and the values read after it on the current line
struct Pending {
    key: String,
    line: usize,
    column: usize,
    values: Vec<String>,
}

/// Block-format reader with optional schema type hints
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockReader<'h> {
    hints: Option<&'h TypeHints>,
}

impl<'h> BlockReader<'h> {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self { hints: None }
    }

    /// Type leaves according to a schema (builder pattern)
    #[must_use]
    #[inline]
    pub const fn with_hints(mut self, hints: &'h TypeHints) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Parse block-format text into a document
    ///
    /// # Errors
    ///
    /// Returns a parse error with the offending position if:
    /// - A `{` or `}` appears where it is not allowed
    /// - An assignment has no value or an opener has several identifiers
    /// - A section is left unclosed at the end of input
    /// - A key is used both as a section and as an assignment
    #[inline]
    pub fn read(&self, input: &str) -> Result<Section, AsconfigError> {
        let mut parser = Parser {
            hints: self.hints,
            state: State::LineStart,
            resume: State::LineStart,
            stack: vec![Frame::new(
                FrameKind::Root,
                String::new(),
                None,
                (1, 1),
                self.hints.map(TypeHints::root),
            )],
            pending: None,
        };

        let result = parser.run(&tokenize(input));
        if result.is_err() {
            parser.state = State::Error;
        }
        result
    }
}

/// Parse block-format text without schema hints
///
/// # Errors
///
/// Returns an error if the text is not well-formed block format
#[inline]
pub fn read(input: &str) -> Result<Section, AsconfigError> {
    BlockReader::new().read(input)
}

struct Parser<'h> {
    hints: Option<&'h TypeHints>,
    state: State,
    /// State to return to once a comment ends
    resume: State,
    stack: Vec<Frame<'h>>,
    pending: Option<Pending>,
}

impl<'h> Parser<'h> {
    fn run(&mut self, tokens: &[Token]) -> Result<Section, AsconfigError> {
        let mut index = 0;
        while let Some(token) = tokens.get(index) {
            if self.step(token)? {
                index += 1;
            }
        }
        self.finish()
    }

    fn line_state(&self) -> State {
        if self.stack.len() > 1 {
            State::InSectionBody
        } else {
            State::LineStart
        }
    }

    /// Feed one token; returns false when the token must be fed again
    fn step(&mut self, token: &Token) -> Result<bool, AsconfigError> {
        match (self.state, &token.kind) {
            (State::Error, _) => Err(AsconfigError::parse(
                token.line,
                token.column,
                "parser is in an error state",
            )),

            (State::InComment, TokenKind::Newline) => {
                self.state = self.resume;
                Ok(true)
            }
            (State::InComment, _) => Ok(true),

            (state, TokenKind::Comment) => {
                if state == State::InAssignment {
                    self.end_assignment_line()?;
                }
                self.resume = self.state;
                self.state = State::InComment;
                Ok(true)
            }

            (State::LineStart | State::InSectionBody, TokenKind::Newline) => Ok(true),
            (State::LineStart | State::InSectionBody, TokenKind::Close) => {
                self.close(token)?;
                Ok(true)
            }
            (State::LineStart | State::InSectionBody, TokenKind::Open) => {
                Err(AsconfigError::parse(token.line, token.column, "unexpected '{' without a key"))
            }
            (State::LineStart | State::InSectionBody, TokenKind::Word(word)) => {
                self.pending = Some(Pending {
                    key: word.clone(),
                    line: token.line,
                    column: token.column,
                    values: Vec::new(),
                });
                self.state = State::InAssignment;
                Ok(true)
            }

            (State::InAssignment, TokenKind::Word(word)) => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.values.push(word.clone());
                }
                Ok(true)
            }
            (State::InAssignment | State::ExpectBrace, TokenKind::Open) => {
                self.open(token)?;
                Ok(true)
            }
            (State::InAssignment, TokenKind::Newline) => {
                self.end_assignment_line()?;
                Ok(true)
            }
            (State::InAssignment, TokenKind::Close) => {
                self.commit()?;
                self.state = self.line_state();
                Ok(false)
            }

            (State::ExpectBrace, TokenKind::Newline) => Ok(true),
            (State::ExpectBrace, TokenKind::Word(_) | TokenKind::Close) => {
                self.commit()?;
                self.state = self.line_state();
                Ok(false)
            }
        }
    }

    /// The line holding a pending key ended: a short line may still turn into an opener
    fn end_assignment_line(&mut self) -> Result<(), AsconfigError> {
        let may_open = self.pending.as_ref().is_some_and(|pending| pending.values.len() <= 1);
        if may_open {
            self.state = State::ExpectBrace;
            Ok(())
        } else {
            self.commit()?;
            self.state = self.line_state();
            Ok(())
        }
    }

    fn finish(&mut self) -> Result<Section, AsconfigError> {
        if matches!(self.state, State::InAssignment | State::ExpectBrace)
            || (self.state == State::InComment && self.resume == State::ExpectBrace)
        {
            self.commit()?;
        }
        if let Some(frame) = self.stack.get(1..).and_then(<[Frame<'h>]>::last) {
            return Err(AsconfigError::parse(
                frame.line,
                frame.column,
                format!("section '{}' is never closed", frame.key),
            ));
        }
        self.state = State::LineStart;
        let root = self.stack.pop().map(|frame| frame.section).unwrap_or_default();
        Ok(root)
    }

    fn top(&mut self) -> &mut Frame<'h> {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open(&mut self, token: &Token) -> Result<(), AsconfigError> {
        let Some(Pending {
            key,
            line,
            column,
            mut values,
        }) = self.pending.take()
        else {
            return Err(AsconfigError::parse(
                token.line,
                token.column,
                "unexpected '{' without a key",
            ));
        };

        if values.len() > 1 {
            return Err(AsconfigError::parse(
                line,
                column,
                format!("section '{key}' has more than one identifier"),
            ));
        }
        let identifier = values.pop();

        let parent_kind = self.top().kind;
        let parent_schema = self.top().schema;
        let kind = if parent_kind == FrameKind::Logging {
            FrameKind::LoggingSink
        } else if parent_kind == FrameKind::Root && key == keys::LOGGING {
            FrameKind::Logging
        } else {
            FrameKind::Section
        };

        let schema = match (kind, self.hints, parent_schema) {
            (FrameKind::LoggingSink, _, schema) => schema,
            (_, Some(hints), Some(parent)) => hints.section(parent, &key, identifier.as_deref()),
            _ => None,
        };

        trace!("Opening section '{key}' at line {line}");
        self.stack
            .push(Frame::new(kind, key, identifier, (line, column), schema));
        self.state = State::InSectionBody;
        Ok(())
    }

    fn close(&mut self, token: &Token) -> Result<(), AsconfigError> {
        if self.stack.len() <= 1 {
            return Err(AsconfigError::parse(
                token.line,
                token.column,
                "'}' without a matching section",
            ));
        }
        let Some(frame) = self.stack.pop() else {
            return Err(AsconfigError::parse(
                token.line,
                token.column,
                "'}' without a matching section",
            ));
        };
        self.state = self.line_state();

        match frame.kind {
            FrameKind::Logging => {
                let parent = &mut self.top().section;
                let value = parent.entry_or_insert_with(&frame.key, || Value::Sections(Vec::new()));
                match value {
                    Value::Sections(sinks) => {
                        sinks.extend(frame.sinks);
                        Ok(())
                    }
                    _ => Err(conflict(&frame, "is used both as a section and as a value")),
                }
            }
            FrameKind::LoggingSink => {
                let mut sink = frame.section;
                let name = frame.identifier.unwrap_or(frame.key);
                sink.insert_first(NAME_KEY, name.as_str());
                self.top().sinks.push(sink);
                Ok(())
            }
            FrameKind::Section | FrameKind::Root => attach(&mut self.top().section, frame),
        }
    }

    fn commit(&mut self) -> Result<(), AsconfigError> {
        let Some(Pending {
            key,
            line,
            column,
            values,
        }) = self.pending.take()
        else {
            return Ok(());
        };

        if values.is_empty() {
            return Err(AsconfigError::parse(line, column, format!("missing value for '{key}'")));
        }

        let hints = self.hints;
        let frame = self.top();
        let schema = frame.schema;
        let hint = |name: &str| hints.and_then(|hints| hints.scalar(schema, name));

        if frame.kind == FrameKind::Logging {
            return Err(AsconfigError::parse(
                line,
                column,
                format!("'{key}' must be inside a logging sink such as 'console' or 'file PATH'"),
            ));
        }

        if frame.kind == FrameKind::LoggingSink && key == keys::LOGGING_CONTEXT {
            let [context, level] = values.as_slice() else {
                return Err(AsconfigError::parse(
                    line,
                    column,
                    "logging context expects a context and a level",
                ));
            };
            let level = type_token(level, hint(context));
            frame.section.insert(context.clone(), level);
            return Ok(());
        }

        if keys::is_listed(&key) {
            let element = if values.len() == 1 {
                type_token(&values[0], hint(&key))
            } else {
                Scalar::Str(values.join(" "))
            };
            let entry = frame
                .section
                .entry_or_insert_with(&key, || Value::Scalars(Vec::new()));
            return match entry {
                Value::Scalars(items) => {
                    items.push(element);
                    Ok(())
                }
                _ => Err(AsconfigError::parse(
                    line,
                    column,
                    format!("'{key}' is used both as a section and as a value"),
                )),
            };
        }

        let kind = hint(&key);
        let mut scalars: Vec<Scalar> = values.iter().map(|token| type_token(token, kind)).collect();
        match frame.section.get_mut(&key) {
            None => {
                let value = if scalars.len() == 1 {
                    Value::Scalar(scalars.remove(0))
                } else {
                    Value::Scalars(scalars)
                };
                frame.section.insert(key, value);
                Ok(())
            }
            Some(Value::Scalars(items)) => {
                items.extend(scalars);
                Ok(())
            }
            Some(existing @ Value::Scalar(_)) => {
                let Value::Scalar(first) =
                    core::mem::replace(existing, Value::Scalars(Vec::new()))
                else {
                    return Ok(());
                };
                let mut items = vec![first];
                items.extend(scalars);
                *existing = Value::Scalars(items);
                Ok(())
            }
            Some(Value::Section(_) | Value::Sections(_)) => Err(AsconfigError::parse(
                line,
                column,
                format!("'{key}' is used both as a section and as a value"),
            )),
        }
    }
}

/// Attach a closed section to its parent
fn attach(parent: &mut Section, frame: Frame<'_>) -> Result<(), AsconfigError> {
    let Frame {
        key,
        identifier,
        line,
        column,
        mut section,
        ..
    } = frame;
    let conflict = |reason: &str| {
        AsconfigError::parse(line, column, format!("section '{key}' {reason}"))
    };

    if keys::is_typed_context(&key) {
        if let Some(identifier) = identifier.as_ref() {
            section.insert_first(TYPE_KEY, identifier.as_str());
        }
        if parent.contains_key(&key) {
            return Err(conflict("is declared twice"));
        }
        parent.insert(key.as_str(), section);
        return Ok(());
    }

    if let Some(identifier) = identifier.as_ref() {
        section.insert_first(NAME_KEY, identifier.as_str());
        let entry = parent.entry_or_insert_with(&key, || Value::Sections(Vec::new()));
        return match entry {
            Value::Sections(items) => {
                items.push(section);
                Ok(())
            }
            _ => Err(conflict("mixes named and unnamed sections")),
        };
    }

    match parent.get_mut(&key) {
        None => {
            parent.insert(key.as_str(), section);
            Ok(())
        }
        Some(Value::Sections(items)) => {
            items.push(section);
            Ok(())
        }
        Some(existing @ Value::Section(_)) => {
            let Value::Section(first) = core::mem::replace(existing, Value::Sections(Vec::new()))
            else {
                return Ok(());
            };
            *existing = Value::Sections(vec![first, section]);
            Ok(())
        }
        Some(Value::Scalar(_) | Value::Scalars(_)) => {
            Err(conflict("is used both as a section and as a value"))
        }
    }
}

fn conflict(frame: &Frame<'_>, reason: &str) -> AsconfigError {
    AsconfigError::parse(frame.line, frame.column, format!("section '{}' {reason}", frame.key))
}
