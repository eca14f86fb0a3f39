// Word lists for the lexical heuristics. All entries are lowercase.

/// Sensational vocabulary, matched as substrings so inflections
/// ("choquante", "scandales") count too.
pub(crate) const SENSATIONAL_WORDS: &[&str] = &[
    "choquant",
    "incroyable",
    "époustouflant",
    "révolutionnaire",
    "scandale",
    "urgent",
    "exclusif",
    "briseur",
    "sensationnel",
    "dramatique",
    "catastrophe",
    "désastreux",
    "honteux",
    "terrifiant",
    "effrayant",
    "complot",
    "stupéfiant",
    "hallucinant",
    "ils vous cachent",
    "la vérité sur",
];

/// Attribution cues. Any hit marks the text as citing a source.
pub(crate) const SOURCE_KEYWORDS: &[&str] = &[
    "selon",
    "source:",
    "source :",
    "d'après",
    "d après",
    "rapporte",
    "étude",
    "recherche",
    "afp",
    "agence france-presse",
    "reuters",
    "associated press",
];

/// AFINN-style valence weights in `[-5, 5]`, French and English.
pub(crate) const SENTIMENT_LEXICON: &[(&str, i32)] = &[
    // negative
    ("catastrophe", -4),
    ("catastrophique", -4),
    ("désastre", -4),
    ("désastreux", -4),
    ("terrifiant", -4),
    ("horrible", -4),
    ("honteux", -3),
    ("honte", -3),
    ("scandale", -3),
    ("scandaleux", -3),
    ("mensonge", -3),
    ("mensonges", -3),
    ("menteur", -3),
    ("effrayant", -3),
    ("peur", -2),
    ("danger", -2),
    ("dangereux", -2),
    ("complot", -2),
    ("crise", -2),
    ("mort", -3),
    ("morts", -3),
    ("tragique", -3),
    ("colère", -2),
    ("furieux", -3),
    ("haine", -3),
    ("choquant", -2),
    ("choquante", -2),
    ("alarmant", -2),
    ("inquiétant", -2),
    ("triste", -2),
    ("échec", -2),
    ("mauvais", -2),
    ("pire", -3),
    ("terrible", -3),
    ("awful", -3),
    ("bad", -3),
    ("fear", -2),
    ("hate", -3),
    ("lie", -2),
    ("lies", -2),
    ("shocking", -2),
    ("worst", -3),
    ("disaster", -3),
    // positive
    ("incroyable", 3),
    ("extraordinaire", 3),
    ("miracle", 4),
    ("miraculeux", 4),
    ("génial", 3),
    ("merveilleux", 4),
    ("fantastique", 4),
    ("formidable", 4),
    ("parfait", 3),
    ("excellent", 3),
    ("magnifique", 3),
    ("bonheur", 3),
    ("heureux", 3),
    ("victoire", 2),
    ("succès", 2),
    ("bon", 1),
    ("bien", 1),
    ("amazing", 4),
    ("awesome", 4),
    ("great", 3),
    ("incredible", 3),
    ("perfect", 3),
    ("good", 3),
    ("love", 3),
];

/// Weight of a lowercase token, if it carries valence.
pub(crate) fn valence(token: &str) -> Option<i32> {
    SENTIMENT_LEXICON
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, weight)| *weight)
}
