//! # Reference Grammar
//!
//! A small recursive-descent grammar over the lexer's tokens. Matching is
//! unanchored: the leftmost position where a rule matches wins, so
//! `"See John 3:16"` resolves to John 3:16.
//!
//! ```text
//! full       := ordinal? name "."? ws* numbers
//! ordinal    := ("1" | "2" | "3" | "4") ws? | ("I" | "II" | "III") ws
//! name       := word ( ws? ( word | number | "(" | ")" ) )*
//! numbers    := chapter ( ":" ws* verse ( ws* dash ws* verse )? | dash chapter )?
//! shorthand  := ( chapter ":" )? verse ( dash verse )?
//! reference  := ( full | shorthand ) ( skip* separator reference )?
//! ```
//!
//! A `name` longer than one word only matches when its letters and digits,
//! run together, are a known book alias (`Wisdom of Solomon`,
//! `Esther (Greek)`, `Psalm 151`). The longest such name wins, so
//! `Letter of Jeremiah 1:1` is not read as `Jeremiah 1:1`. A single word
//! matches syntactically and is classified afterwards:
//!
//! - verse keyword (`v`, `vs`, `verse`, `verses` …) → verse in the context chapter
//! - chapter keyword (`ch`, `chap`, `chapter` …) → chapter in the context book
//! - anything else → book name looked up in the [`BookTable`]
//!
//! Keywords only apply without an ordinal, so `2 Ch 5` is 2 Chronicles.
//! `shorthand` is only tried when no `full` match exists anywhere.

use std::sync::LazyLock;

use regex::Regex;

use super::parser::Parser;
use super::{Context, ReferenceSpec};
use crate::books::BookTable;
use crate::lexer::{Token, TokenKind, lex};

static VERSE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^V(?:ER)?(?:SE)?S?$").expect("Invalid verse keyword regex"));

static CHAPTER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^CH(?:AP)?T?(?:ER)?S?$").expect("Invalid chapter keyword regex")
});

/// Most parts a book name can span ("Song of the Three Young Men" has six).
const MAX_NAME_PARTS: usize = 8;

/// The numeric part of a reference, as written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Numbers {
    chapter: u32,
    verse: Option<u32>,
    final_verse: Option<u32>,
    /// Bare `-N` after the chapter.
    final_chapter: Option<u32>,
}

/// A syntactic `full` match before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FullMatch {
    ordinal: Option<u8>,
    /// Letters and digits of the name, without spaces or parentheses.
    name: String,
    /// Name spans more than one part; never a keyword.
    compound: bool,
    numbers: Numbers,
}

/// Parse one reference string (plus any continuations) into resolved specs.
///
/// Returns an empty list when nothing resolves; see the module docs for the
/// accepted forms.
pub fn parse_reference(reference: &str, context: &Context) -> Vec<ReferenceSpec> {
    let tokens = lex(reference);
    parse_tokens(&tokens, context)
}

/// Resolve a bare book name ("Gen", "1 John", "Wisdom of Solomon") to a
/// book-only spec.
pub fn book_reference(name: &str, include_apocrypha: bool) -> Option<ReferenceSpec> {
    let tokens = lex(name.trim());
    let table = BookTable::standard();

    let mut p = Parser::at_position(&tokens, 0);
    let ordinal = ordinal(&mut p);
    let name_start = if ordinal.is_some() { p.pos() } else { 0 };
    p.reset(name_start);

    for (end, name) in name_extents(&mut p) {
        p.reset(end);
        p.eat(TokenKind::Dot);
        if !p.at_end() {
            continue;
        }
        if let Some(book) = table.resolve(&book_key(ordinal, &name), include_apocrypha) {
            return Some(ReferenceSpec::book(book));
        }
    }
    None
}

pub(crate) fn parse_tokens(tokens: &[Token<'_>], context: &Context) -> Vec<ReferenceSpec> {
    let mut specs = Vec::new();
    let mut context = *context;
    let mut rest = tokens;

    loop {
        let Some((spec, end)) = next_spec(rest, &context) else {
            break;
        };
        specs.push(spec);
        context = context.after(&spec);

        // skip anything up to the first separator; the remainder is a continuation
        match rest[end..].iter().position(|t| t.kind.is_separator()) {
            Some(i) => rest = &rest[end + i + 1..],
            None => break,
        }
    }

    specs
}

/// The first reference in `tokens` and the index just past it.
fn next_spec(tokens: &[Token<'_>], context: &Context) -> Option<(ReferenceSpec, usize)> {
    if let Some((m, end)) = find(tokens, |p| full(p, context.include_apocrypha)) {
        return resolve(&m, context).map(|spec| (spec, end));
    }

    let book = context.book?;
    let ((chapter, verse, final_verse), end) = find(tokens, shorthand)?;
    let spec = ReferenceSpec {
        book,
        initial_chapter: chapter.or(context.chapter),
        initial_verse: Some(verse),
        final_verse,
        final_chapter: None,
    };
    Some((spec, end))
}

/// Try `rule` at every position, returning the leftmost match and its end.
fn find<'t, 'i, T>(
    tokens: &'t [Token<'i>],
    rule: impl Fn(&mut Parser<'t, 'i>) -> Option<T>,
) -> Option<(T, usize)> {
    (0..tokens.len()).find_map(|start| {
        let mut p = Parser::at_position(tokens, start);
        rule(&mut p).map(|m| (m, p.pos()))
    })
}

fn resolve(m: &FullMatch, context: &Context) -> Option<ReferenceSpec> {
    let n = m.numbers;
    let plain = m.ordinal.is_none() && !m.compound;

    if plain && VERSE_KEYWORD.is_match(&m.name) {
        return Some(ReferenceSpec {
            book: context.book?,
            initial_chapter: Some(context.chapter?),
            initial_verse: Some(n.chapter),
            final_verse: n.final_chapter,
            final_chapter: None,
        });
    }

    let book = if plain && CHAPTER_KEYWORD.is_match(&m.name) {
        context.book?
    } else {
        BookTable::standard().resolve(&book_key(m.ordinal, &m.name), context.include_apocrypha)?
    };

    Some(ReferenceSpec {
        book,
        initial_chapter: Some(n.chapter),
        initial_verse: n.verse,
        final_verse: n.final_verse,
        final_chapter: n.final_chapter,
    })
}

/// Lookup key for the book table: ordinal digit folded onto the name.
fn book_key(ordinal: Option<u8>, name: &str) -> String {
    match ordinal {
        Some(n) => format!("{n}{name}"),
        None => name.to_string(),
    }
}

/// `full := ordinal? name "."? ws* numbers`
fn full(p: &mut Parser<'_, '_>, include_apocrypha: bool) -> Option<FullMatch> {
    let start = p.pos();
    if let Some(ordinal) = ordinal(p)
        && let Some(m) = named(p, Some(ordinal), include_apocrypha)
    {
        return Some(m);
    }
    p.reset(start);
    named(p, None, include_apocrypha)
}

/// A name followed by its numbers, trying the longest name first.
///
/// After an ordinal every name must resolve; without one a single word is
/// accepted as is and left for [`resolve`] to classify.
fn named(
    p: &mut Parser<'_, '_>,
    ordinal: Option<u8>,
    include_apocrypha: bool,
) -> Option<FullMatch> {
    let start = p.pos();
    let extents = name_extents(p);
    let parts = extents.len();

    for (i, (end, name)) in extents.into_iter().enumerate() {
        let compound = i + 1 < parts;
        if (compound || ordinal.is_some())
            && BookTable::standard()
                .resolve(&book_key(ordinal, &name), include_apocrypha)
                .is_none()
        {
            continue;
        }

        p.reset(end);
        p.eat(TokenKind::Dot);
        p.eat_whitespace();
        if let Some(chapter) = p.number() {
            return Some(FullMatch {
                ordinal,
                name,
                compound,
                numbers: numbers(p, chapter),
            });
        }
    }

    p.reset(start);
    None
}

/// `name := word ( ws? ( word | number | "(" | ")" ) )*`
///
/// Every prefix of the name that ends on a part, longest first, as the
/// cursor position after it and its lookup key. Empty unless the cursor is
/// on a word.
fn name_extents(p: &mut Parser<'_, '_>) -> Vec<(usize, String)> {
    let mut extents = Vec::new();
    let Some(first) = p.word() else {
        return extents;
    };
    let mut key = first.to_string();
    extents.push((p.pos(), key.clone()));

    while extents.len() < MAX_NAME_PARTS {
        p.eat_whitespace();
        let Some(token) = p.bump() else { break };
        match token.kind {
            TokenKind::Word | TokenKind::Number => key.push_str(token.text),
            TokenKind::Text if token.text == "(" || token.text == ")" => {}
            _ => break,
        }
        extents.push((p.pos(), key.clone()));
    }

    extents.reverse();
    extents
}

/// Book ordinal: a digit 1-4 (space optional) or a Roman numeral I-III
/// followed by a space.
fn ordinal(p: &mut Parser<'_, '_>) -> Option<u8> {
    let token = p.bump()?;
    match token.kind {
        TokenKind::Number => {
            let n = match token.text {
                "1" => 1,
                "2" => 2,
                "3" => 3,
                "4" => 4,
                _ => return None,
            };
            p.eat_whitespace();
            Some(n)
        }
        TokenKind::Word
            if token.text.len() <= 3 && token.text.bytes().all(|b| b.eq_ignore_ascii_case(&b'I')) =>
        {
            if !p.eat_whitespace() {
                return None;
            }
            Some(token.text.len() as u8)
        }
        _ => None,
    }
}

/// `numbers := chapter ( ":" ws* verse ( ws* dash ws* verse )? | dash chapter )?`
///
/// Optional parts that don't complete are left unconsumed.
fn numbers(p: &mut Parser<'_, '_>, chapter: u32) -> Numbers {
    let mut n = Numbers {
        chapter,
        ..Numbers::default()
    };
    let save = p.pos();

    if p.eat(TokenKind::Colon) {
        p.eat_whitespace();
        let Some(verse) = p.number() else {
            p.reset(save);
            return n;
        };
        n.verse = Some(verse);

        let after_verse = p.pos();
        p.eat_whitespace();
        if p.eat(TokenKind::Dash) {
            p.eat_whitespace();
            if let Some(final_verse) = p.number() {
                n.final_verse = Some(final_verse);
                return n;
            }
        }
        p.reset(after_verse);
    } else if p.eat(TokenKind::Dash) {
        match p.number() {
            Some(final_chapter) => n.final_chapter = Some(final_chapter),
            None => p.reset(save),
        }
    }

    n
}

/// `shorthand := ( chapter ":" )? verse ( dash verse )?` with no whitespace.
fn shorthand(p: &mut Parser<'_, '_>) -> Option<(Option<u32>, u32, Option<u32>)> {
    let first = p.number()?;

    let save = p.pos();
    let (chapter, verse) = if p.eat(TokenKind::Colon) {
        match p.number() {
            Some(verse) => (Some(first), verse),
            None => {
                p.reset(save);
                (None, first)
            }
        }
    } else {
        (None, first)
    };

    let save = p.pos();
    let final_verse = if p.eat(TokenKind::Dash) {
        let n = p.number();
        if n.is_none() {
            p.reset(save);
        }
        n
    } else {
        None
    };

    Some((chapter, verse, final_verse))
}

/// End index of a locator candidate starting at `start`, if any.
///
/// A candidate is either a syntactic `full` match, or a bare number range
/// directly after a `,`/`;` (one optional whitespace token in between).
pub(crate) fn candidate_end(
    tokens: &[Token<'_>],
    start: usize,
    include_apocrypha: bool,
) -> Option<usize> {
    let mut p = Parser::at_position(tokens, start);
    if full(&mut p, include_apocrypha).is_some() {
        return Some(p.pos());
    }

    let follows_separator = match start {
        0 => false,
        1 => tokens[0].kind.is_separator(),
        _ => {
            tokens[start - 1].kind.is_separator()
                || (tokens[start - 1].kind == TokenKind::Whitespace && tokens[start - 2].kind.is_separator())
        }
    };
    if !follows_separator {
        return None;
    }

    let mut p = Parser::at_position(tokens, start);
    let chapter = p.number()?;
    numbers(&mut p, chapter);
    Some(p.pos())
}
