//! Recursive descent parser producing the syntax tree
//!
//! Error tolerant: anything that cannot be read becomes an `⚠` node (at the
//! top level, or as the child of the note it is glued to) and parsing moves
//! on. Header lines and comments are whole-line nodes.

use super::tokens::{
    barline_len, is_accidental, is_dot_mark, is_duration_char, is_header_line, is_junk_letter,
    is_octave_mark, is_pitch_letter, is_rest, shorthand_ornament, starts_item, starts_musical,
    starts_note,
};
use crate::syntax::{NodeKind, Ornament, SyntaxTree, TreeBuilder};
use crate::text::cursor::TextRange;

/// Parse a whole document
pub fn parse_abc(text: &str) -> SyntaxTree {
    let items = Parser::new(text).parse();
    log::debug!("parsed {} top-level nodes", items.len());

    let mut builder = TreeBuilder::new();
    builder.start_node(NodeKind::Program, 0);
    for item in &items {
        item.emit(&mut builder);
    }
    builder.finish_node(text.len());
    builder.finish()
}

/// Parsed node waiting to be written into the tree
#[derive(Debug, Clone, PartialEq)]
struct Item {
    kind: NodeKind,
    range: TextRange,
    children: Vec<Item>,
}

impl Item {
    fn leaf(kind: NodeKind, from: usize, to: usize) -> Self {
        Self {
            kind,
            range: TextRange::new(from, to),
            children: Vec::new(),
        }
    }

    fn node(kind: NodeKind, from: usize, to: usize, children: Vec<Item>) -> Self {
        Self {
            kind,
            range: TextRange::new(from, to),
            children,
        }
    }

    fn emit(&self, builder: &mut TreeBuilder) {
        if self.children.is_empty() {
            builder.leaf(self.kind.clone(), self.range);
            return;
        }
        builder.start_node(self.kind.clone(), self.range.from);
        for child in &self.children {
            child.emit(builder);
        }
        builder.finish_node(self.range.to);
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    items: Vec<Item>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            items: Vec::new(),
        }
    }

    fn parse(mut self) -> Vec<Item> {
        while self.pos < self.text.len() {
            self.line();
        }
        self.items
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Next character if it lies before `end`
    fn peek_until(&self, end: usize) -> Option<char> {
        self.peek().filter(|_| self.pos < end)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume characters matching `pred` up to `end`; returns the start
    fn eat_while(&mut self, end: usize, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek_until(end) {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        start
    }

    /// Consume a run into a leaf, if non-empty
    fn run(&mut self, end: usize, kind: NodeKind, pred: impl Fn(char) -> bool) -> Option<Item> {
        let start = self.eat_while(end, pred);
        (self.pos > start).then(|| Item::leaf(kind, start, self.pos))
    }

    fn line(&mut self) {
        let start = self.pos;
        let end = self.text[start..]
            .find('\n')
            .map_or(self.text.len(), |i| start + i);
        let line = &self.text[start..end];

        if is_header_line(line) {
            let len = line.trim_end().len();
            self.items.push(Item::leaf(NodeKind::Metadata, start, start + len));
        } else if line.starts_with('%') {
            self.items.push(Item::leaf(NodeKind::Comment, start, end));
        } else {
            self.music(end);
        }

        // Skip the newline
        self.pos = if end < self.text.len() { end + 1 } else { end };
    }

    fn music(&mut self, end: usize) {
        while let Some(c) = self.peek_until(end) {
            let start = self.pos;
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '%' {
                self.items.push(Item::leaf(NodeKind::Comment, start, end));
                self.pos = end;
                break;
            }
            if let Some(len) = barline_len(&self.text[start..end]) {
                self.pos += len;
                self.items.push(Item::leaf(NodeKind::Barline, start, self.pos));
                continue;
            }

            let item = if starts_musical(c) {
                let first = self.musical(end);
                self.dotted(first, end)
            } else if c == '!' {
                self.long_decoration(end)
            } else if let Some(ornament) = shorthand_ornament(c) {
                self.bump();
                let mark = Item::leaf(NodeKind::Ornament(ornament), start, self.pos);
                Item::node(NodeKind::Decoration, start, self.pos, vec![mark])
            } else {
                self.pass_through(c, end)
            };
            self.items.push(item);
        }
    }

    fn musical(&mut self, end: usize) -> Item {
        match self.peek() {
            Some('[') => self.chord(end),
            Some(c) if is_rest(c) => self.rest(end),
            _ => self.note(end),
        }
    }

    /// accidental* pitch octave* junk? duration?
    fn note(&mut self, end: usize) -> Item {
        let from = self.pos;
        let mut children = Vec::new();
        children.extend(self.run(end, NodeKind::Accidental, is_accidental));

        if self.peek_until(end).is_some_and(is_pitch_letter) {
            let start = self.pos;
            self.bump();
            children.push(Item::leaf(NodeKind::Pitch, start, self.pos));
            children.extend(self.run(end, NodeKind::Octave, is_octave_mark));
            children.extend(self.run(end, NodeKind::Error, is_junk_letter));
            children.extend(self.run(end, NodeKind::Duration, is_duration_char));
        }
        Item::node(NodeKind::Note, from, self.pos, children)
    }

    fn rest(&mut self, end: usize) -> Item {
        let from = self.pos;
        self.bump();
        let mut children = Vec::new();
        children.extend(self.run(end, NodeKind::Error, is_junk_letter));
        children.extend(self.run(end, NodeKind::Duration, is_duration_char));
        Item::node(NodeKind::Rest, from, self.pos, children)
    }

    /// `[` notes `]`; an empty chord gets a zero-width placeholder note
    fn chord(&mut self, end: usize) -> Item {
        let from = self.pos;
        self.bump();
        let mut children = Vec::new();
        let mut close = None;

        while let Some(c) = self.peek_until(end) {
            if c == ']' {
                close = Some(self.pos);
                self.bump();
                break;
            }
            if c.is_whitespace() {
                self.bump();
            } else if starts_note(c) {
                children.push(self.note(end));
            } else {
                let start = self.pos;
                self.bump();
                children.push(Item::leaf(NodeKind::Error, start, self.pos));
            }
        }

        if !children.iter().any(|child| child.kind == NodeKind::Note) {
            let at = close.unwrap_or(self.pos);
            children.push(Item::leaf(NodeKind::Note, at, at));
        }
        Item::node(NodeKind::Chord, from, self.pos, children)
    }

    /// Wrap `first` in a dotted rhythm when a `>`/`<` run follows it
    fn dotted(&mut self, first: Item, end: usize) -> Item {
        let Some(mark) = self.peek_until(end).filter(|c| is_dot_mark(*c)) else {
            return first;
        };
        let dot_from = self.eat_while(end, |c| c == mark);
        let dot = Item::leaf(NodeKind::Dot, dot_from, self.pos);
        let dot_to = self.pos;

        self.eat_while(end, |c| c == ' ' || c == '\t');
        let from = first.range.from;
        if self.peek_until(end).is_some_and(starts_musical) {
            let second = self.musical(end);
            let to = second.range.to;
            return Item::node(NodeKind::DottedRhythm, from, to, vec![first, dot, second]);
        }

        // No partner: leave the trailing space to the caller
        self.pos = dot_to;
        Item::node(NodeKind::DottedRhythm, from, dot_to, vec![first, dot])
    }

    /// `!name!`
    fn long_decoration(&mut self, end: usize) -> Item {
        let from = self.pos;
        self.bump();
        let name_from = self.eat_while(end, |c| c != '!');
        let name_to = self.pos;
        if self.peek_until(end) != Some('!') {
            return Item::leaf(NodeKind::Error, from, self.pos);
        }
        self.bump();

        let name = &self.text[name_from..name_to];
        let children = Ornament::from_long_name(name)
            .map(|ornament| vec![Item::leaf(NodeKind::Ornament(ornament), from, self.pos)])
            .unwrap_or_default();
        Item::node(NodeKind::Decoration, from, self.pos, children)
    }

    /// Slurs, ties, annotations, and anything unreadable
    fn pass_through(&mut self, c: char, end: usize) -> Item {
        let from = self.pos;
        self.bump();
        let kind = match c {
            '(' | ')' => NodeKind::Other("Slur".to_string()),
            '-' => NodeKind::Other("Tie".to_string()),
            '"' => {
                self.eat_while(end, |c| c != '"');
                if self.peek_until(end) != Some('"') {
                    return Item::leaf(NodeKind::Error, from, self.pos);
                }
                self.bump();
                NodeKind::Other("Annotation".to_string())
            }
            _ => {
                self.eat_while(end, |c| !starts_item(c));
                NodeKind::Error
            }
        };
        Item::leaf(kind, from, self.pos)
    }
}
