use std::collections::BTreeMap;

use lectio_syntax::BookCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Token, TokenId};

const PARAGRAPH_TYPES: &[&str] = &["p", "q1", "q2", "pc", "qs"];
const HEADER_TYPES: &[&str] = &["s"];

/// Chapter content as stored: verse number → one or more subsections,
/// iterated in verse order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chapter(pub BTreeMap<u32, VerseEntry>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerseEntry {
    Many(Vec<Subsection>),
    One(Subsection),
}

impl VerseEntry {
    pub fn subsections(&self) -> &[Subsection] {
        match self {
            VerseEntry::Many(subsections) => subsections,
            VerseEntry::One(subsection) => std::slice::from_ref(subsection),
        }
    }
}

/// One styled run of a verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    /// Section heading shown before this subsection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Chapter number shown in place of the verse number (first verse).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Token>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// The paragraph class in a space-separated type string, if any.
pub fn paragraph_type(kind: &str) -> Option<&str> {
    kind.split_whitespace().find(|c| PARAGRAPH_TYPES.contains(c))
}

/// The header class in a space-separated type string, if any.
pub fn header_type(kind: &str) -> Option<&str> {
    kind.split_whitespace().find(|c| HEADER_TYPES.contains(c))
}

/// Flatten chapter content into render-order tokens.
///
/// For each verse, in order:
///
/// 1. a subsection's `header` becomes an id-less `s` token;
/// 2. the first subsection is preceded by a `label` token carrying the verse
///    number, or a `label chapter` token carrying the chapter when the
///    subsection has one; a paragraph class on the subsection moves to the
///    label (`label p`);
/// 3. every subsection becomes a token with id `BOOK.CHAPTER.VERSE`.
pub fn flatten_chapter(book: BookCode, chapter_number: u32, chapter: &Chapter) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (verse, entry) in &chapter.0 {
        let verse = verse.to_string();
        let id = TokenId::new(book, chapter_number, &verse);

        for (i, subsection) in entry.subsections().iter().enumerate() {
            if let Some(header) = &subsection.header {
                tokens.push(Token::new("s", header.as_str()));
            }

            let mut kind = subsection.kind.clone();
            if i == 0 {
                let mut label = match subsection.chapter.as_ref().and_then(chapter_label) {
                    Some(chapter) => Token::new("label chapter", chapter),
                    None => Token::new("label", verse.as_str()),
                };
                if let Some(paragraph) = paragraph_type(&subsection.kind) {
                    label.kind = format!("{} {paragraph}", label.kind);
                    kind = without_class(&subsection.kind, paragraph);
                }
                tokens.push(label);
            }

            let mut attributes = subsection.attributes.clone();
            if let Some(chapter) = &subsection.chapter {
                attributes.insert("chapter".to_string(), chapter.clone());
            }
            tokens.push(Token {
                id: Some(id.clone()),
                kind,
                content: subsection.content.clone(),
                children: subsection.children.clone(),
                attributes,
            });
        }
    }

    tokens
}

/// Label text for a subsection's `chapter` field; falsy values mean none.
fn chapter_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn without_class(kind: &str, class: &str) -> String {
    kind.split_whitespace()
        .filter(|c| *c != class)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use lectio_syntax::BookTable;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn listing(tokens: &[Token]) -> String {
        let mut result = String::new();
        for t in tokens {
            let id = t.id.as_ref().map(TokenId::as_str).unwrap_or("-");
            result.push_str(&format!("{id} [{}] {:?}\n", t.kind, t.content));
        }
        result
    }

    fn chapter(json: &str) -> Chapter {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn flattens_verses_in_numeric_order() {
        let content = chapter(
            r#"{
                "10": {"type": "", "content": "ten"},
                "2": {"type": "", "content": "two"},
                "1": {"type": "p", "content": "one", "chapter": 3, "header": "Title"}
            }"#,
        );
        let jhn = BookTable::standard().code("JHN").unwrap();

        assert_snapshot!(listing(&flatten_chapter(jhn, 3, &content)), @r#"
        - [s] "Title"
        - [label chapter p] "3"
        JHN.3.1 [] "one"
        - [label] "2"
        JHN.3.2 [] "two"
        - [label] "10"
        JHN.3.10 [] "ten"
        "#);
    }

    #[test]
    fn only_first_subsection_gets_a_label() {
        let content = chapter(
            r#"{"16": [
                {"type": "q1 wj", "content": "For God so loved"},
                {"type": "q2", "content": "the world"},
                {"type": "", "content": "that", "header": "Aside"}
            ]}"#,
        );
        let jhn = BookTable::standard().code("JHN").unwrap();

        assert_snapshot!(listing(&flatten_chapter(jhn, 3, &content)), @r#"
        - [label q1] "16"
        JHN.3.16 [wj] "For God so loved"
        JHN.3.16 [q2] "the world"
        - [s] "Aside"
        JHN.3.16 [] "that"
        "#);
    }

    #[test]
    fn carries_children_and_attributes() {
        let content = chapter(
            r#"{"1": {"type": "", "content": "", "strongs": "H7225",
                      "children": [{"type": "w", "content": "In"}]}}"#,
        );
        let gen_ = BookTable::standard().code("GEN").unwrap();
        let tokens = flatten_chapter(gen_, 1, &content);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].attributes["strongs"], "H7225");
        let children = tokens[1].children.as_ref().unwrap();
        assert_eq!(children[0].content, "In");
        assert_eq!(children[0].id, None);
    }

    #[test]
    fn zero_chapter_field_is_ignored() {
        let content = chapter(r#"{"1": {"type": "", "content": "x", "chapter": 0}}"#);
        let gen_ = BookTable::standard().code("GEN").unwrap();
        assert_eq!(flatten_chapter(gen_, 1, &content)[0].kind, "label");
    }

    #[test]
    fn empty_chapter_has_no_tokens() {
        let gen_ = BookTable::standard().code("GEN").unwrap();
        assert_eq!(flatten_chapter(gen_, 1, &Chapter::default()), vec![]);
    }

    #[rstest]
    #[case("p", Some("p"))]
    #[case("wj q1", Some("q1"))]
    #[case("pc qs", Some("pc"))]
    #[case("wj", None)]
    #[case("", None)]
    fn classifies_paragraph_types(#[case] kind: &str, #[case] expected: Option<&str>) {
        assert_eq!(paragraph_type(kind), expected);
    }

    #[rstest]
    #[case("s", Some("s"))]
    #[case("wj s", Some("s"))]
    #[case("sp", None)]
    fn classifies_header_types(#[case] kind: &str, #[case] expected: Option<&str>) {
        assert_eq!(header_type(kind), expected);
    }
}
