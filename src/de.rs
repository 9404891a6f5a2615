//! Qoid markup parsing.
//!
//! This module provides the [`Parser`] that rebuilds Qoid trees from
//! markup text.
//!
//! ## Overview
//!
//! - **Line oriented**: every line is trimmed and classified by its first
//!   character (`#`, `%`, `/`) or as a property line
//! - **Single pass**: registers nest through an explicit stack, no
//!   backtracking
//! - **Error reporting**: every failure is an [`Error::Format`] carrying the
//!   1-based line number and the offending line
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use qoid::{parse_collection, Container};
//!
//! let text = "#alpha\nip: 10.0.0.1\n\n#beta\nip: 10.0.0.2\n";
//! let hosts = parse_collection("hosts", text).unwrap();
//!
//! assert_eq!(hosts.tags(), vec!["alpha", "beta"]);
//! ```

use crate::node::Tagged;
use crate::options::QoidOptions;
use crate::{Collection, Container, Error, Property, Qoid, Register, Result};

/// One classified markup line.
enum Line<'a> {
    Blank,
    Qoid(&'a str),
    Collection(&'a str),
    Register(&'a str),
    Terminator,
    Property(&'a str, &'a str),
}

/// A collection under construction and its open qoid.
struct Open {
    collection: Collection,
    qoid: Option<Qoid>,
}

impl Open {
    fn new(tag: impl Into<String>) -> Self {
        Open {
            collection: Collection::new(tag),
            qoid: None,
        }
    }

    fn close_qoid(&mut self) {
        if let Some(qoid) = self.qoid.take() {
            self.collection.append(qoid);
        }
    }

    fn start_qoid(&mut self, number: usize, raw: &str, tag: &str) -> Result<()> {
        if self.qoid.is_some() {
            return Err(Error::format(number, "unterminated qoid", raw.trim()));
        }
        self.qoid = Some(Qoid::new(tag));
        Ok(())
    }

    fn push_property(&mut self, number: usize, raw: &str, tag: &str, value: &str) -> Result<()> {
        if tag.is_empty() {
            return Err(Error::format(number, "empty property tag", raw.trim()));
        }
        match self.qoid.as_mut() {
            Some(qoid) => {
                qoid.append(Property::new(tag, value));
                Ok(())
            }
            None => Err(Error::format(number, "property outside of a qoid", raw.trim())),
        }
    }

    fn finish(mut self) -> Collection {
        self.close_qoid();
        self.collection
    }
}

/// A register under construction and its open collection child.
///
/// A `block` frame is a `/ tag` header followed directly by qoids: it reads
/// as a collection named by the header and needs no terminator. An
/// `implicit` frame is the headerless register that gathers blocks which
/// have no enclosing `/ tag` register.
struct Frame {
    register: Register,
    open: Option<Open>,
    block: bool,
    implicit: bool,
}

impl Frame {
    fn new(tag: &str) -> Self {
        Frame {
            register: Register::new(tag),
            open: None,
            block: false,
            implicit: false,
        }
    }

    fn implicit() -> Self {
        Frame {
            implicit: true,
            ..Frame::new("")
        }
    }

    fn into_collection(self) -> Collection {
        let tag = self.register.tag().to_string();
        self.open.map_or_else(|| Collection::new(tag), Open::finish)
    }

    fn close_collection(&mut self) {
        if let Some(open) = self.open.take() {
            self.register.append(open.finish());
        }
    }

    fn qoid_open(&self) -> bool {
        self.open.as_ref().map_or(false, |open| open.qoid.is_some())
    }
}

/// The Qoid markup parser.
///
/// # Examples
///
/// ```rust
/// use qoid::{Container, Delimiter, Parser, QoidOptions};
///
/// let options = QoidOptions::new().with_delimiter(Delimiter::Equals);
/// let qoid = Parser::with_options("#point\nx= 1\ny= 2\n", &options)
///     .parse_qoid()
///     .unwrap();
///
/// assert_eq!(qoid.value_of("y").unwrap(), "2");
/// ```
pub struct Parser<'a> {
    input: &'a str,
    delimiter: char,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser::with_options(input, &QoidOptions::default())
    }

    pub fn with_options(input: &'a str, options: &QoidOptions) -> Self {
        Parser {
            input,
            delimiter: options.delimiter.as_char(),
        }
    }

    fn classify(&self, raw: &'a str) -> Line<'a> {
        let line = raw.trim();
        if line.is_empty() {
            Line::Blank
        } else if let Some(tag) = line.strip_prefix('#') {
            Line::Qoid(tag.trim())
        } else if let Some(tag) = line.strip_prefix('%') {
            Line::Collection(tag.trim())
        } else if let Some(tag) = line.strip_prefix('/') {
            match tag.trim() {
                "" => Line::Terminator,
                tag => Line::Register(tag),
            }
        } else {
            match line.split_once(self.delimiter) {
                Some((tag, value)) => Line::Property(tag.trim(), value.trim()),
                None => Line::Property(line, ""),
            }
        }
    }

    fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> {
        self.input.lines().enumerate().map(|(i, line)| (i + 1, line))
    }

    /// Parses collection text: qoids separated by blank lines.
    ///
    /// # Errors
    ///
    /// [`Error::Format`] on a property outside a qoid, an unterminated qoid,
    /// an empty qoid or property tag or register syntax.
    pub fn parse_collection(&self, tag: impl Into<String>) -> Result<Collection> {
        let mut open = Open::new(tag);
        for (number, raw) in self.lines() {
            match self.classify(raw) {
                Line::Blank => open.close_qoid(),
                Line::Qoid(tag) => open.start_qoid(number, raw, tag)?,
                Line::Property(tag, value) => open.push_property(number, raw, tag, value)?,
                Line::Collection(_) | Line::Register(_) | Line::Terminator => {
                    return Err(Error::format(
                        number,
                        "register syntax in collection text",
                        raw.trim(),
                    ));
                }
            }
        }
        let collection = open.finish();
        tracing::debug!(
            "Parsed collection '{}' with {} qoids",
            collection.tag(),
            collection.len()
        );
        Ok(collection)
    }

    /// Parses register text opened by `/ tag` and closed by `/`.
    ///
    /// A `/ tag` header followed directly by qoids is read as a collection
    /// block instead. A block ends at the next `/` line or at the end of
    /// input. Blocks outside any register are gathered into a register
    /// with an empty tag, which also ends at the end of input.
    ///
    /// # Errors
    ///
    /// [`Error::Format`] on a missing header, an unterminated qoid or
    /// register, a stray terminator, a qoid outside a collection, a `%`
    /// header inside a block, or content after the closing terminator.
    pub fn parse_register(&self) -> Result<Register> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<Register> = None;
        let mut last = 0;

        for (number, raw) in self.lines() {
            last = number;
            let line = self.classify(raw);
            if root.is_some() {
                if matches!(line, Line::Blank) {
                    continue;
                }
                return Err(Error::format(number, "content after register terminator", raw.trim()));
            }

            match line {
                Line::Blank => {
                    if let Some(open) = stack.last_mut().and_then(|frame| frame.open.as_mut()) {
                        open.close_qoid();
                    }
                }
                Line::Property(tag, value) => {
                    match stack.last_mut().and_then(|frame| frame.open.as_mut()) {
                        Some(open) => open.push_property(number, raw, tag, value)?,
                        None => {
                            return Err(Error::format(number, "property outside of a qoid", raw.trim()));
                        }
                    }
                }
                Line::Qoid(tag) => {
                    let frame = Self::current(&mut stack, number, raw)?;
                    if frame.open.is_none() && frame.register.is_empty() && !frame.implicit {
                        frame.block = true;
                        frame.open = Some(Open::new(frame.register.tag()));
                    }
                    match frame.open.as_mut() {
                        Some(open) => open.start_qoid(number, raw, tag)?,
                        None => {
                            return Err(Error::format(
                                number,
                                "qoid outside of a collection",
                                raw.trim(),
                            ));
                        }
                    }
                }
                Line::Collection(tag) => {
                    let frame = Self::current(&mut stack, number, raw)?;
                    if frame.block {
                        return Err(Error::format(
                            number,
                            "collection header inside a collection block",
                            raw.trim(),
                        ));
                    }
                    if tag.is_empty() {
                        return Err(Error::format(number, "empty collection tag", raw.trim()));
                    }
                    frame.close_collection();
                    frame.open = Some(Open::new(tag));
                }
                Line::Register(tag) => {
                    if let Some(frame) = stack.last_mut() {
                        if frame.qoid_open() {
                            return Err(Error::format(number, "unterminated qoid", raw.trim()));
                        }
                        if !frame.block {
                            frame.close_collection();
                        }
                    }
                    Self::close_block(&mut stack);
                    stack.push(Frame::new(tag));
                }
                Line::Terminator => {
                    if stack.last().map_or(false, Frame::qoid_open) {
                        return Err(Error::format(number, "unterminated qoid", raw.trim()));
                    }
                    if Self::close_block(&mut stack) {
                        continue;
                    }
                    let mut frame = match stack.pop() {
                        Some(frame) => frame,
                        None => {
                            return Err(Error::format(
                                number,
                                "register terminator without an open register",
                                raw.trim(),
                            ));
                        }
                    };
                    frame.close_collection();
                    match stack.last_mut() {
                        Some(parent) => parent.register.append(frame.register),
                        None => root = Some(frame.register),
                    }
                }
            }
        }

        Self::close_block(&mut stack);
        if stack.len() == 1 && stack[0].implicit {
            root = stack.pop().map(|frame| frame.register);
        }
        if let Some(frame) = stack.last() {
            return Err(Error::format(
                last,
                "unterminated register",
                &format!("/ {}", frame.register.tag()),
            ));
        }
        let register =
            root.ok_or_else(|| Error::format(last.max(1), "missing register header", ""))?;
        tracing::debug!(
            "Parsed register '{}' with {} entries",
            register.tag(),
            register.len()
        );
        Ok(register)
    }

    /// Parses text holding exactly one qoid.
    ///
    /// # Errors
    ///
    /// [`Error::Format`] if the text is malformed or holds zero or several
    /// qoids.
    pub fn parse_qoid(&self) -> Result<Qoid> {
        let mut collection = self.parse_collection("")?;
        if collection.len() != 1 {
            return Err(Error::format(
                1,
                &format!("expected exactly one qoid, found {}", collection.len()),
                self.input.lines().next().unwrap_or("").trim(),
            ));
        }
        collection.delete(0)
    }

    /// Closes the innermost frame if it is a collection block, appending the
    /// collection to the enclosing register. A block with no enclosing
    /// register starts an implicit one. Returns whether a block was closed.
    ///
    /// Callers reject an open qoid before closing.
    fn close_block(stack: &mut Vec<Frame>) -> bool {
        let block = match stack.pop() {
            Some(frame) if frame.block => frame,
            Some(frame) => {
                stack.push(frame);
                return false;
            }
            None => return false,
        };
        let collection = block.into_collection();
        match stack.last_mut() {
            Some(parent) => parent.register.append(collection),
            None => {
                let mut root = Frame::implicit();
                root.register.append(collection);
                stack.push(root);
            }
        }
        true
    }

    /// Returns the innermost open register, rejecting headers that arrive
    /// while a qoid is still open.
    fn current<'s>(stack: &'s mut [Frame], number: usize, raw: &str) -> Result<&'s mut Frame> {
        let frame = stack
            .last_mut()
            .ok_or_else(|| Error::format(number, "missing register header", raw.trim()))?;
        if frame.qoid_open() {
            return Err(Error::format(number, "unterminated qoid", raw.trim()));
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entry;

    #[test]
    fn test_indentation_and_spacing_ignored() {
        let collection = Parser::new("  #q\n    a :   1  \n\tb:2\n")
            .parse_collection("c")
            .unwrap();
        let qoid = collection.get(0).unwrap();
        assert_eq!(qoid.value_of("a").unwrap(), "1");
        assert_eq!(qoid.value_of("b").unwrap(), "2");
    }

    #[test]
    fn test_value_may_contain_delimiter() {
        let qoid = Parser::new("#links\nhome: http://example.com\n")
            .parse_qoid()
            .unwrap();
        assert_eq!(qoid.value_of("home").unwrap(), "http://example.com");
    }

    #[test]
    fn test_line_without_delimiter_is_empty_property() {
        let qoid = Parser::new("#flags\nverbose\n").parse_qoid().unwrap();
        assert_eq!(qoid.get(0).unwrap(), &Property::new("verbose", ""));
    }

    #[test]
    fn test_property_outside_qoid() {
        let err = Parser::new("#q\na: 1\n\nb: 2\n").parse_collection("c").unwrap_err();
        assert!(matches!(err, Error::Format { line: 4, .. }));
    }

    #[test]
    fn test_unterminated_qoid() {
        let err = Parser::new("#a\nx: 1\n#b\n").parse_collection("c").unwrap_err();
        match err {
            Error::Format { line, msg, context } => {
                assert_eq!(line, 3);
                assert_eq!(msg, "unterminated qoid");
                assert_eq!(context, "#b");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_property_tag() {
        let err = Parser::new("#q\n: value\n").parse_collection("c").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_register_syntax_in_collection() {
        assert!(Parser::new("% c\n").parse_collection("c").is_err());
        assert!(Parser::new("/ r\n").parse_collection("c").is_err());
    }

    #[test]
    fn test_nested_register() {
        let text = "/ root\n\n% hosts\n#a\nip: 1\n\n/ sub\n\n% empty\n\n/\n\n/\n";
        let root = Parser::new(text).parse_register().unwrap();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.tags(), vec!["hosts", "sub"]);
        match root.get("sub").unwrap() {
            Entry::Register(sub) => {
                assert_eq!(sub.tags(), vec!["empty"]);
                assert_eq!(sub.get(0).unwrap().position(), Some(0));
            }
            Entry::Collection(_) => panic!("expected a register"),
        }
    }

    #[test]
    fn test_empty_qoid_tag() {
        let qoid = Parser::new("#\nk: v\n").parse_qoid().unwrap();
        assert_eq!(qoid.tag(), "");
        assert_eq!(qoid.value_of("k").unwrap(), "v");
    }

    #[test]
    fn test_header_followed_by_qoids_is_a_collection() {
        let register = Parser::new("/ r\n\n#q\na: 1\n\n").parse_register().unwrap();
        assert_eq!(register.tag(), "");
        assert_eq!(register.tags(), vec!["r"]);
        let r = register.get("r").unwrap().as_collection().unwrap();
        assert_eq!(r.get("q").unwrap().value_of("a").unwrap(), "1");
    }

    #[test]
    fn test_blocks_without_terminators() {
        let text = "/ hosts\n\n#a\nip: 1\n\n#b\n\n/ notes\n\n#todo\nfix\n";
        let register = Parser::new(text).parse_register().unwrap();
        assert_eq!(register.tags(), vec!["hosts", "notes"]);
        assert_eq!(register.collections().count(), 2);
        assert_eq!(register.get(0).unwrap().as_collection().unwrap().len(), 2);
    }

    #[test]
    fn test_block_inside_register() {
        let text = "/ root\n\n% c\n#x\n\n/ sub\n\n#q\n\n/\n\n/\n";
        let root = Parser::new(text).parse_register().unwrap();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.tags(), vec!["c", "sub"]);
        assert!(root.get("sub").unwrap().as_collection().is_some());
    }

    #[test]
    fn test_register_errors() {
        let cases = [
            ("", 1, "missing register header"),
            ("#q\n", 1, "missing register header"),
            ("/ r\n\n/ s\n\n/\n#q\n", 6, "qoid outside of a collection"),
            ("/ r\n\n#q\n\n% c\n", 5, "collection header inside a collection block"),
            ("/ r\n\n#q\na: 1\n/\n", 5, "unterminated qoid"),
            ("/ r\n\n% c\n\n/ s\n\n#q\n", 7, "unterminated register"),
            ("/ r\n\n% c\n#q\na: 1\n/\n", 6, "unterminated qoid"),
            ("/ r\n\n% c\n", 3, "unterminated register"),
            ("/\n", 1, "register terminator without an open register"),
            ("/ r\n/\n% c\n", 3, "content after register terminator"),
            ("/ r\n% \n/\n", 2, "empty collection tag"),
        ];
        for (text, expected_line, expected_msg) in cases {
            match Parser::new(text).parse_register() {
                Err(Error::Format { line, msg, .. }) => {
                    assert_eq!(line, expected_line, "{text:?}");
                    assert_eq!(msg, expected_msg, "{text:?}");
                }
                other => panic!("{text:?} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_qoid_requires_one() {
        assert!(Parser::new("").parse_qoid().is_err());
        assert!(Parser::new("#a\n\n#b\n").parse_qoid().is_err());
        assert!(!Parser::new("#a\n").parse_qoid().unwrap().has_parent());
    }
}
