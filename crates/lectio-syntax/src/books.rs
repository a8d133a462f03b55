//! Canonical book table: USFM codes, aliases, titles and chapter counts.
//!
//! The table is static and split into two partitions. The canon is always
//! searched; the apocrypha only when a caller asks for it, and only after the
//! canon failed to resolve the name.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Canon,
    Apocrypha,
}

/// Static metadata for one book.
#[derive(Debug)]
pub struct BookInfo {
    /// USFM code, e.g. `JHN`.
    pub code: &'static str,
    /// Short human title, e.g. `John`.
    pub title: &'static str,
    /// Long title, preferred for display when present.
    pub full_title: Option<&'static str>,
    pub chapters: u32,
    /// Upper-case lookup names (the code is implicitly an alias too).
    pub aliases: &'static [&'static str],
    pub partition: Partition,
}

impl BookInfo {
    /// The title used when rendering references.
    pub fn display_title(&self) -> &'static str {
        self.full_title.unwrap_or(self.title)
    }
}

/// A resolved canonical book.
///
/// Only the [`BookTable`] hands these out, so a `BookCode` is never a raw
/// alias.
#[derive(Clone, Copy)]
pub struct BookCode(&'static BookInfo);

impl BookCode {
    pub fn as_str(self) -> &'static str {
        self.0.code
    }

    pub fn info(self) -> &'static BookInfo {
        self.0
    }
}

impl PartialEq for BookCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.code == other.0.code
    }
}

impl Eq for BookCode {}

impl Hash for BookCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.code.hash(state);
    }
}

impl fmt::Debug for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookCode({})", self.0.code)
    }
}

impl fmt::Display for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.code)
    }
}

impl Serialize for BookCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.code)
    }
}

/// Alias index over one partition.
struct Index {
    books: &'static [BookInfo],
    by_alias: HashMap<&'static str, usize>,
}

impl Index {
    fn build(books: &'static [BookInfo]) -> Self {
        let mut by_alias = HashMap::new();
        for (i, book) in books.iter().enumerate() {
            by_alias.insert(book.code, i);
            for alias in book.aliases {
                by_alias.insert(*alias, i);
            }
        }
        Self { books, by_alias }
    }

    fn get(&self, name: &str) -> Option<BookCode> {
        self.by_alias.get(name).map(|&i| BookCode(&self.books[i]))
    }
}

/// Lookup over both partitions.
pub struct BookTable {
    canon: Index,
    apocrypha: Index,
}

static STANDARD: LazyLock<BookTable> = LazyLock::new(|| BookTable {
    canon: Index::build(CANON),
    apocrypha: Index::build(APOCRYPHA),
});

impl BookTable {
    /// The process-wide table, built on first use.
    pub fn standard() -> &'static BookTable {
        &STANDARD
    }

    /// Resolve a book name (ordinal already folded in, e.g. `1JOHN`).
    ///
    /// Case-insensitive. Canon first; apocrypha only if requested and the
    /// canon has no match.
    pub fn resolve(&self, name: &str, include_apocrypha: bool) -> Option<BookCode> {
        let name = name.to_ascii_uppercase();
        self.canon.get(&name).or_else(|| {
            if include_apocrypha {
                self.apocrypha.get(&name)
            } else {
                None
            }
        })
    }

    /// Look up an exact canonical code in either partition.
    pub fn code(&self, code: &str) -> Option<BookCode> {
        let code = code.to_ascii_uppercase();
        [&self.canon, &self.apocrypha]
            .into_iter()
            .flat_map(|index| index.books.iter())
            .find(|book| book.code == code)
            .map(BookCode)
    }

    /// Books of the canon, optionally followed by the apocrypha, in table order.
    pub fn books(&self, include_apocrypha: bool) -> impl Iterator<Item = BookCode> + '_ {
        let apocrypha: &'static [BookInfo] = if include_apocrypha {
            self.apocrypha.books
        } else {
            &[]
        };
        self.canon.books.iter().chain(apocrypha).map(BookCode)
    }
}

macro_rules! book {
    ($partition:ident, $code:literal, $title:literal, $chapters:literal, [$($alias:literal),* $(,)?]) => {
        book!($partition, $code, $title, None, $chapters, [$($alias),*])
    };
    ($partition:ident, $code:literal, $title:literal, $full:expr, $chapters:literal, [$($alias:literal),* $(,)?]) => {
        BookInfo {
            code: $code,
            title: $title,
            full_title: $full,
            chapters: $chapters,
            aliases: &[$($alias),*],
            partition: Partition::$partition,
        }
    };
}

static CANON: &[BookInfo] = &[
    book!(Canon, "GEN", "Genesis", 50, ["GENESIS", "GE", "GN"]),
    book!(Canon, "EXO", "Exodus", 40, ["EXODUS", "EX", "EXOD"]),
    book!(Canon, "LEV", "Leviticus", 27, ["LEVITICUS", "LE", "LV"]),
    book!(Canon, "NUM", "Numbers", 36, ["NUMBERS", "NU", "NB", "NM"]),
    book!(Canon, "DEU", "Deuteronomy", 34, ["DEUTERONOMY", "DEUT", "DT"]),
    book!(Canon, "JOS", "Joshua", 24, ["JOSHUA", "JOSH", "JSH"]),
    book!(Canon, "JDG", "Judges", 21, ["JUDGES", "JUDG", "JG", "JDGS"]),
    book!(Canon, "RUT", "Ruth", 4, ["RUTH", "RTH", "RU"]),
    book!(Canon, "1SA", "1 Samuel", 31, ["1SAMUEL", "1SAM", "1SM", "1S"]),
    book!(Canon, "2SA", "2 Samuel", 24, ["2SAMUEL", "2SAM", "2SM", "2S"]),
    book!(Canon, "1KI", "1 Kings", 22, ["1KINGS", "1KGS", "1KG", "1K"]),
    book!(Canon, "2KI", "2 Kings", 25, ["2KINGS", "2KGS", "2KG", "2K"]),
    book!(Canon, "1CH", "1 Chronicles", 29, ["1CHRONICLES", "1CHRON", "1CHR"]),
    book!(Canon, "2CH", "2 Chronicles", 36, ["2CHRONICLES", "2CHRON", "2CHR"]),
    book!(Canon, "EZR", "Ezra", 10, ["EZRA"]),
    book!(Canon, "NEH", "Nehemiah", 13, ["NEHEMIAH", "NE"]),
    book!(Canon, "EST", "Esther", 10, ["ESTHER", "ESTH", "ES"]),
    book!(Canon, "JOB", "Job", 42, ["JB"]),
    book!(Canon, "PSA", "Psalms", 150, ["PSALMS", "PSALM", "PS", "PSLM", "PSS"]),
    book!(Canon, "PRO", "Proverbs", 31, ["PROVERBS", "PROV", "PRV", "PR"]),
    book!(Canon, "ECC", "Ecclesiastes", 12, ["ECCLESIASTES", "ECCL", "ECCLES", "QOH", "QOHELETH"]),
    book!(Canon, "SNG", "Song", Some("Song of Songs"), 8, ["SONG", "SONGS", "SONGOFSONGS", "SONGOFSOLOMON", "SOS", "CANTICLES", "CANT"]),
    book!(Canon, "ISA", "Isaiah", 66, ["ISAIAH", "IS"]),
    book!(Canon, "JER", "Jeremiah", 52, ["JEREMIAH", "JE", "JR"]),
    book!(Canon, "LAM", "Lamentations", 5, ["LAMENTATIONS", "LA"]),
    book!(Canon, "EZK", "Ezekiel", 48, ["EZEKIEL", "EZEK", "EZE"]),
    book!(Canon, "DAN", "Daniel", 12, ["DANIEL", "DA", "DN"]),
    book!(Canon, "HOS", "Hosea", 14, ["HOSEA", "HO"]),
    book!(Canon, "JOL", "Joel", 3, ["JOEL", "JL"]),
    book!(Canon, "AMO", "Amos", 9, ["AMOS", "AM"]),
    book!(Canon, "OBA", "Obadiah", 1, ["OBADIAH", "OBAD", "OB"]),
    book!(Canon, "JON", "Jonah", 4, ["JONAH", "JNH"]),
    book!(Canon, "MIC", "Micah", 7, ["MICAH", "MC"]),
    book!(Canon, "NAM", "Nahum", 3, ["NAHUM", "NAH"]),
    book!(Canon, "HAB", "Habakkuk", 3, ["HABAKKUK", "HB"]),
    book!(Canon, "ZEP", "Zephaniah", 3, ["ZEPHANIAH", "ZEPH", "ZP"]),
    book!(Canon, "HAG", "Haggai", 2, ["HAGGAI", "HG"]),
    book!(Canon, "ZEC", "Zechariah", 14, ["ZECHARIAH", "ZECH", "ZC"]),
    book!(Canon, "MAL", "Malachi", 4, ["MALACHI", "ML"]),
    book!(Canon, "MAT", "Matthew", 28, ["MATTHEW", "MATT", "MT"]),
    book!(Canon, "MRK", "Mark", 16, ["MARK", "MAR", "MK"]),
    book!(Canon, "LUK", "Luke", 24, ["LUKE", "LK", "LU"]),
    book!(Canon, "JHN", "John", 21, ["JOHN", "JN", "JOH"]),
    book!(Canon, "ACT", "Acts", 28, ["ACTS", "AC"]),
    book!(Canon, "ROM", "Romans", 16, ["ROMANS", "RO", "RM"]),
    book!(Canon, "1CO", "1 Corinthians", 16, ["1CORINTHIANS", "1COR"]),
    book!(Canon, "2CO", "2 Corinthians", 13, ["2CORINTHIANS", "2COR"]),
    book!(Canon, "GAL", "Galatians", 6, ["GALATIANS", "GA"]),
    book!(Canon, "EPH", "Ephesians", 6, ["EPHESIANS", "EPHES"]),
    book!(Canon, "PHP", "Philippians", 4, ["PHILIPPIANS", "PHIL", "PP"]),
    book!(Canon, "COL", "Colossians", 4, ["COLOSSIANS"]),
    book!(Canon, "1TH", "1 Thessalonians", 5, ["1THESSALONIANS", "1THESS", "1THES"]),
    book!(Canon, "2TH", "2 Thessalonians", 3, ["2THESSALONIANS", "2THESS", "2THES"]),
    book!(Canon, "1TI", "1 Timothy", 6, ["1TIMOTHY", "1TIM", "1TM"]),
    book!(Canon, "2TI", "2 Timothy", 4, ["2TIMOTHY", "2TIM", "2TM"]),
    book!(Canon, "TIT", "Titus", 3, ["TITUS"]),
    book!(Canon, "PHM", "Philemon", 1, ["PHILEMON", "PHILEM"]),
    book!(Canon, "HEB", "Hebrews", 13, ["HEBREWS"]),
    book!(Canon, "JAS", "James", 5, ["JAMES", "JM"]),
    book!(Canon, "1PE", "1 Peter", 5, ["1PETER", "1PET", "1PT", "1P"]),
    book!(Canon, "2PE", "2 Peter", 3, ["2PETER", "2PET", "2PT", "2P"]),
    book!(Canon, "1JN", "1 John", 5, ["1JOHN", "1JHN", "1JO"]),
    book!(Canon, "2JN", "2 John", 1, ["2JOHN", "2JHN", "2JO"]),
    book!(Canon, "3JN", "3 John", 1, ["3JOHN", "3JHN", "3JO"]),
    book!(Canon, "JUD", "Jude", 1, ["JUDE"]),
    book!(Canon, "REV", "Revelation", 22, ["REVELATION", "REVELATIONS", "RE", "RV"]),
];

static APOCRYPHA: &[BookInfo] = &[
    book!(Apocrypha, "TOB", "Tobit", 14, ["TOBIT", "TB"]),
    book!(Apocrypha, "JDT", "Judith", 16, ["JUDITH", "JDTH"]),
    book!(Apocrypha, "ESG", "Esther (Greek)", 10, ["ESTHERGREEK", "GREEKESTHER", "GKESTHER", "ADDESTH"]),
    book!(Apocrypha, "WIS", "Wisdom", Some("Wisdom of Solomon"), 19, ["WISDOM", "WISDOMOFSOLOMON", "WISD"]),
    book!(Apocrypha, "SIR", "Sirach", 51, ["SIRACH", "ECCLESIASTICUS", "ECCLUS"]),
    book!(Apocrypha, "BAR", "Baruch", 6, ["BARUCH"]),
    book!(Apocrypha, "LJE", "Letter of Jeremiah", 1, ["LETTEROFJEREMIAH", "LETJER", "EPJER"]),
    book!(Apocrypha, "S3Y", "Song of Three", Some("Song of the Three Young Men"), 1, ["SONGOFTHREE", "SONGOFTHETHREEYOUNGMEN", "SONGOFTHETHREE", "AZARIAH", "SGTHREE", "SONGTHREE"]),
    book!(Apocrypha, "SUS", "Susanna", 1, ["SUSANNA"]),
    book!(Apocrypha, "BEL", "Bel", Some("Bel and the Dragon"), 1, ["BELANDTHEDRAGON", "BELDRAGON"]),
    book!(Apocrypha, "1MA", "1 Maccabees", 16, ["1MACCABEES", "1MACC", "1MAC"]),
    book!(Apocrypha, "2MA", "2 Maccabees", 15, ["2MACCABEES", "2MACC", "2MAC"]),
    book!(Apocrypha, "3MA", "3 Maccabees", 7, ["3MACCABEES", "3MACC", "3MAC"]),
    book!(Apocrypha, "4MA", "4 Maccabees", 18, ["4MACCABEES", "4MACC", "4MAC"]),
    book!(Apocrypha, "1ES", "1 Esdras", 9, ["1ESDRAS", "1ESD"]),
    book!(Apocrypha, "2ES", "2 Esdras", 16, ["2ESDRAS", "2ESD"]),
    book!(Apocrypha, "MAN", "Manasseh", Some("Prayer of Manasseh"), 1, ["MANASSEH", "PRAYEROFMANASSEH", "PRMAN"]),
    book!(Apocrypha, "PS2", "Psalm 151", 1, ["PSALM151", "PS151"]),
];
