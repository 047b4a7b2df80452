use std::collections::BTreeMap;

use crate::Coverage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Testament {
    Old,
    New,
}

/// Static description of one canonical book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Canonical position, 1 (Genesis) through 66 (Revelation).
    pub number: u8,
    pub key: &'static str,
    pub display: &'static str,
    pub chapters: u32,
    /// Abbreviation used in Blue Letter Bible URLs.
    pub url_abbrev: &'static str,
    /// Abbreviations that may prefix verse text in externally labelled sources.
    pub text_abbrevs: &'static [&'static str],
}

impl Book {
    pub fn testament(&self) -> Testament {
        if self.number <= 39 {
            Testament::Old
        } else {
            Testament::New
        }
    }
}

const fn book(
    number: u8,
    key: &'static str,
    display: &'static str,
    chapters: u32,
    url_abbrev: &'static str,
    text_abbrevs: &'static [&'static str],
) -> Book {
    Book {
        number,
        key,
        display,
        chapters,
        url_abbrev,
        text_abbrevs,
    }
}

const BOOKS: [Book; 66] = [
    book(1, "genesis", "Genesis", 50, "gen", &["Gen"]),
    book(2, "exodus", "Exodus", 40, "exo", &["Ex", "Exo"]),
    book(3, "leviticus", "Leviticus", 27, "lev", &["Lev"]),
    book(4, "numbers", "Numbers", 36, "num", &["Num"]),
    book(5, "deuteronomy", "Deuteronomy", 34, "deu", &["Deu", "Deut"]),
    book(6, "joshua", "Joshua", 24, "jos", &["Jos"]),
    book(7, "judges", "Judges", 21, "jdg", &["Jdg", "Jue"]),
    book(8, "ruth", "Ruth", 4, "rut", &["Rth", "Rut"]),
    book(9, "1-samuel", "1 Samuel", 31, "1sa", &["1Sa", "Sa", "Sam"]),
    book(10, "2-samuel", "2 Samuel", 24, "2sa", &["2Sa", "Sa", "Sam"]),
    book(11, "1-kings", "1 Kings", 22, "1ki", &["Ki", "Rey"]),
    book(12, "2-kings", "2 Kings", 25, "2ki", &["2Ki", "Ki", "Rey"]),
    book(13, "1-chronicles", "1 Chronicles", 29, "1ch", &["1Ch", "Ch"]),
    book(14, "2-chronicles", "2 Chronicles", 36, "2ch", &["2Ch", "Ch"]),
    book(15, "ezra", "Ezra", 10, "ezr", &["Esd", "Ezr"]),
    book(16, "nehemiah", "Nehemiah", 13, "neh", &["Neh"]),
    book(17, "esther", "Esther", 10, "est", &["Est"]),
    book(18, "job", "Job", 42, "job", &["Job"]),
    book(19, "psalms", "Psalms", 150, "psa", &["Psa", "Sal"]),
    book(20, "proverbs", "Proverbs", 31, "pro", &["Pro", "Prov"]),
    book(21, "ecclesiastes", "Ecclesiastes", 12, "ecc", &["Ecc", "Ecl"]),
    book(22, "song-of-solomon", "Song of Solomon", 8, "sng", &["Sng", "Cant"]),
    book(23, "isaiah", "Isaiah", 66, "isa", &["Isa"]),
    book(24, "jeremiah", "Jeremiah", 52, "jer", &["Jer"]),
    book(25, "lamentations", "Lamentations", 5, "lam", &["Lam"]),
    book(26, "ezekiel", "Ezekiel", 48, "eze", &["Eze", "Ezeq"]),
    book(27, "daniel", "Daniel", 12, "dan", &["Dan"]),
    book(28, "hosea", "Hosea", 14, "hos", &["Hos", "Os"]),
    book(29, "joel", "Joel", 3, "joe", &["Joe", "Joel"]),
    book(30, "amos", "Amos", 9, "amo", &["Amo"]),
    book(31, "obadiah", "Obadiah", 1, "oba", &["Abd", "Oba"]),
    book(32, "jonah", "Jonah", 4, "jon", &["Jon"]),
    book(33, "micah", "Micah", 7, "mic", &["Mic", "Miq"]),
    book(34, "nahum", "Nahum", 3, "nah", &["Nah"]),
    book(35, "habakkuk", "Habakkuk", 3, "hab", &["Hab"]),
    book(36, "zephaniah", "Zephaniah", 3, "zep", &["Sof", "Zep"]),
    book(37, "haggai", "Haggai", 2, "hag", &["Hag"]),
    book(38, "zechariah", "Zechariah", 14, "zec", &["Zac", "Zec"]),
    book(39, "malachi", "Malachi", 4, "mal", &["Mal"]),
    book(40, "matthew", "Matthew", 28, "mat", &["Mat"]),
    book(41, "mark", "Mark", 16, "mar", &["Mar"]),
    book(42, "luke", "Luke", 24, "luk", &["Luc", "Luk"]),
    book(43, "john", "John", 21, "jhn", &["Jhn", "Juan"]),
    book(44, "acts", "Acts", 28, "act", &["Act", "Hech"]),
    book(45, "romans", "Romans", 16, "rom", &["Rom"]),
    book(46, "1-corinthians", "1 Corinthians", 16, "1co", &["1Co", "Co", "Cor"]),
    book(47, "2-corinthians", "2 Corinthians", 13, "2co", &["2Co", "Co", "Cor"]),
    book(48, "galatians", "Galatians", 6, "gal", &["Gal"]),
    book(49, "ephesians", "Ephesians", 6, "eph", &["Ef", "Eph"]),
    book(50, "philippians", "Philippians", 4, "phi", &["Fil", "Phl"]),
    book(51, "colossians", "Colossians", 4, "col", &["Col"]),
    book(52, "1-thessalonians", "1 Thessalonians", 5, "1th", &["1Th", "Th", "Tes"]),
    book(53, "2-thessalonians", "2 Thessalonians", 3, "2th", &["2Th", "Th", "Tes"]),
    book(54, "1-timothy", "1 Timothy", 6, "1ti", &["1Ti", "Ti", "Tim"]),
    book(55, "2-timothy", "2 Timothy", 4, "2ti", &["2Ti", "Ti", "Tim"]),
    book(56, "titus", "Titus", 3, "tit", &["Tit", "Tito"]),
    book(57, "philemon", "Philemon", 1, "phm", &["Filem", "Phm"]),
    book(58, "hebrews", "Hebrews", 13, "heb", &["Heb"]),
    book(59, "james", "James", 5, "jas", &["Jas", "Sant"]),
    book(60, "1-peter", "1 Peter", 5, "1pe", &["Pe", "Ped"]),
    book(61, "2-peter", "2 Peter", 3, "2pe", &["Pe", "Ped"]),
    book(62, "1-john", "1 John", 5, "1jo", &["1Jo", "Jo", "Jn"]),
    book(63, "2-john", "2 John", 1, "2jo", &["2Jo", "Jo", "Jn"]),
    book(64, "3-john", "3 John", 1, "3jo", &["3Jo", "Jo", "Jn"]),
    book(65, "jude", "Jude", 1, "jud", &["Jde"]),
    book(66, "revelation", "Revelation", 22, "rev", &["Apoc", "Rev"]),
];

/// Translation codes grouped by the language directory they are stored under.
const LANGUAGES: &[(&str, &[&str])] = &[
    (
        "english",
        &[
            "kj21", "asv", "amp", "ampc", "brg", "csb", "csba", "ceb", "cjb", "cev", "darby",
            "dlnt", "dra", "erv", "easy", "ehv", "esv", "esvuk", "exb", "gnv", "gw", "gnt",
            "hcsb", "icb", "isv", "phillips", "jub", "kjv", "akjv", "lsb", "leb", "tlb", "msg",
            "mev", "mounce", "nog", "nabre", "nasb", "nasb1995", "ncb", "ncv", "net", "niv",
            "nivuk", "nkjv", "nlv", "nlt", "nmb", "nrsva", "nrsvace", "nrsvce", "nrsvue", "ntfe",
            "ojb", "rgt", "rsv", "rsvce", "tlv", "voice", "web", "we", "wyc", "ylt", "bbe",
            "dby", "hnv", "nasb20", "nasb95", "bes",
        ],
    ),
    (
        "spanish",
        &[
            "lbla", "jbs", "dhh", "nbla", "nbv", "ntv", "nvi", "cst", "pdt", "blp", "blph",
            "rva-2015", "rvc", "rvr1960", "rvr1977", "rvr1995", "rva", "srv-brg", "tla", "rvr09",
            "rvr60",
        ],
    ),
    ("french", &["bds", "lsg", "neg1979", "sg21", "ls"]),
    (
        "german",
        &["hof", "luth1545", "ngu-de", "sch1951", "sch2000", "em", "lut"],
    ),
    (
        "portuguese",
        &["arc", "vfl", "ntlh", "nvt", "nvi-pt", "ol"],
    ),
    ("italian", &["bdg", "cei", "lnd", "nr1994", "nr2006"]),
    ("dutch", &["bb", "htb"]),
    (
        "russian",
        &["nrt", "cars", "carst", "car-sa", "erv-ru", "rusv", "rst"],
    ),
    (
        "chinese",
        &[
            "ccb", "ccbt", "erv-zh", "cnvs", "cnvt", "csbs", "csbt", "cuvs", "cuv", "cuvmps",
            "cuvmpt", "rcu17ss", "rcu17ts", "cht",
        ],
    ),
    ("japanese", &["jerv", "jlb"]),
    ("korean", &["koerv", "klb", "kor"]),
    ("hindi", &["erv-hi", "shb"]),
    ("arabic", &["erv-ar", "nav", "svd"]),
    ("hebrew", &["hhh", "wlc"]),
    (
        "greek",
        &[
            "tr1550", "whnu", "tr1894", "sblgnt", "thgnt", "lxx", "mgnt", "tr", "na28",
        ],
    ),
    ("latin", &["vulgate", "vul"]),
    (
        "filipino",
        &[
            "fsv", "abtag1978", "abtag2001", "adb1905", "snd", "asnd", "mbbtag", "mbbtag-dc",
        ],
    ),
    ("ukrainian", &["ukr", "erv-uk"]),
    (
        "bulgarian",
        &["bg1940", "bulg", "erv-bg", "cbt", "bob", "bpb"],
    ),
    ("czech", &["b21", "snc"]),
    ("danish", &["bph", "dn1933"]),
    ("swedish", &["nub", "sv1917", "sfb", "sfb15", "svl", "se"]),
    ("norwegian", &["dnb1930", "lb"]),
    ("finnish", &["r1933"]),
    ("hungarian", &["kar", "erv-hu", "nt-hu"]),
    ("polish", &["np", "sz-pl", "ubg"]),
    ("romanian", &["rmnn", "ntlr"]),
    ("croatian", &["shp", "hnz-ri", "cro"]),
    ("serbian", &["nsp", "erv-sr"]),
    ("vietnamese", &["bd2011", "nvb", "bpt"]),
    ("indonesian", &["amd"]),
    ("tamil", &["erv-ta"]),
    ("telugu", &["terv"]),
    ("thai", &["ntv-bible", "erv-th", "tncv"]),
];

/// Language directories the batch converter walks, in this order.
const LANGUAGE_DIRS: &[&str] = &[
    "arabic", "bulgarian", "chinese", "croatian", "czech", "danish", "dutch", "english",
    "finnish", "french", "german", "greek", "hebrew", "hindi", "hungarian", "indonesian",
    "italian", "japanese", "korean", "latin", "norwegian", "polish", "portuguese", "romanian",
    "russian", "serbian", "spanish", "swedish", "filipino", "tamil", "telugu", "thai", "turkish",
    "ukrainian", "vietnamese",
];

const BLUE_LETTER_TRANSLATIONS: &[&str] = &[
    "kjv", "nkjv", "nlt", "niv", "esv", "csb", "nasb95", "nasb20", "lsb", "amp", "net", "rsv",
    "asv", "ylt", "dby", "web", "hnv", "vul", "nav", "wlc", "lxx", "mgnt", "tr", "svd", "bes",
    "rvr09", "rvr60", "bbe", "cht", "em", "kor", "ls", "lut", "rst", "se",
];

const KNOWN_COVERAGE: &[(&str, Coverage)] = &[
    ("wlc", Coverage::OldTestament),
    ("mgnt", Coverage::NewTestament),
];

const FALLBACK_LANGUAGE: &str = "english";

/// Read-only lookup tables, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    languages: BTreeMap<String, String>,
    language_dirs: Vec<String>,
    blue_letter: Vec<String>,
    coverage: BTreeMap<String, Coverage>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let mut languages = BTreeMap::new();
        for (language, codes) in LANGUAGES {
            for code in *codes {
                languages.insert((*code).to_string(), (*language).to_string());
            }
        }
        Self {
            books: BOOKS.to_vec(),
            languages,
            language_dirs: LANGUAGE_DIRS.iter().map(|s| s.to_string()).collect(),
            blue_letter: BLUE_LETTER_TRANSLATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            coverage: KNOWN_COVERAGE
                .iter()
                .map(|(code, cov)| (code.to_string(), *cov))
                .collect(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, key: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.key == key)
    }

    pub fn book_by_number(&self, number: u8) -> Option<&Book> {
        self.books.iter().find(|b| b.number == number)
    }

    /// Accepts a book key (`1-samuel`) or a 1-based canonical number (`9`).
    pub fn resolve_book(&self, input: &str) -> Option<&Book> {
        let trimmed = input.trim().to_ascii_lowercase();
        if let Ok(number) = trimmed.parse::<u8>() {
            return self.book_by_number(number);
        }
        self.book(&trimmed)
    }

    /// Display name for a book key; unknown keys are title-cased.
    pub fn display_name(&self, key: &str) -> String {
        match self.book(key) {
            Some(book) => book.display.to_string(),
            None => title_case(key),
        }
    }

    pub fn language_for(&self, translation: &str) -> &str {
        self.languages
            .get(&translation.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or(FALLBACK_LANGUAGE)
    }

    pub fn language_dirs(&self) -> &[String] {
        &self.language_dirs
    }

    pub fn blue_letter_translations(&self) -> &[String] {
        &self.blue_letter
    }

    /// Coverage known up front for translations that only carry one testament.
    pub fn known_coverage(&self, translation: &str) -> Option<Coverage> {
        self.coverage
            .get(&translation.to_ascii_lowercase())
            .copied()
    }

    pub fn total_chapters(&self) -> u32 {
        self.books.iter().map(|b| b.chapters).sum()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn title_case(key: &str) -> String {
    key.split(['-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
