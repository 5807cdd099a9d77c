//! Keyword-to-topic mapping rules for subject-based enrichment.
//!
//! The table is an ordered slice, not a map: declaration order is the
//! first-match precedence for the keyword stage, so earlier rules shadow
//! later ones on any subject phrase that contains both keywords.

/// Ordered (keyword substring, canonical topic) rules. Keywords are matched
/// against lower-cased subject phrases.
pub const MAPPING_RULES: &[(&str, &str)] = &[
    ("children", "Youth and culture"),
    ("bilateral economic and trade agreements", "International trade"),
    ("women", "Gender equality"),
    ("refugee", "Migration"),
    ("third-country", "Foreign affairs"),
    ("information and communication technologies", "Digital"),
    ("ozone", "Climate and environment"),
    ("fundamental freedoms", "Democracy"),
    ("investments", "Economy and budget"),
    ("financial services", "Economy and budget"),
    ("financial reporting and auditing", "Economy and budget"),
    ("diseases", "Health"),
    ("medicine", "Health"),
    ("protection of privacy and data protection", "Data protection and privacy"),
    ("principles common to the member states", "Democracy"),
    ("eu values", "Democracy"),
    ("common security and defence policy", "Defense"),
    ("nato", "Foreign affairs"),
    ("action to combat terrorism", "Security and Justice"),
    ("structural funds", "Economy and budget"),
    ("investment funds", "Economy and budget"),
    ("capital outflow", "Economy and budget"),
    ("money laundering", "Security and Justice"),
    ("european investment bank", "Economy and budget"),
    ("business of parliament", "Democracy"),
    ("rules of procedure", "Democracy"),
    ("fundamental rights in the eu", "Human rights"),
    ("charter", "Human rights"),
    ("common foreign and security policy", "Foreign affairs"),
    ("interinstitutional relations", "Democracy"),
    ("subsidiarity", "Democracy"),
    ("proportionality", "Democracy"),
    ("comitology", "Democracy"),
    ("action to combat crime", "Security and Justice"),
    ("judicial cooperation in criminal matters", "Security and Justice"),
    ("committees", "Democracy"),
    ("interparliamentary delegations", "Democracy"),
    ("european parliament", "Democracy"),
    ("elections", "Democracy"),
    ("direct universal suffrage", "Democracy"),
    ("cohesion policy", "Economy and budget"),
    ("company law", "Economy and budget"),
    ("road transport", "Transport"),
    ("european ombudsman", "Democracy"),
    ("people with disabilities", "Social protection"),
    ("internal market", "Economy and budget"),
    ("single market", "Economy and budget"),
    ("innovation", "Digital"),
    ("state and evolution of the union", "Democracy"),
    ("european commission", "Democracy"),
    ("financial management", "Economy and budget"),
    ("business loans", "Economy and budget"),
    ("accounting", "Economy and budget"),
    ("banks and credit", "Economy and budget"),
    ("small and medium-sized enterprises", "Economy and budget"),
    ("craft industries", "Economy and budget"),
    ("citizen rights", "Human rights"),
    ("scientific and technological cooperation", "Digital"),
    ("equal treatment", "Human rights"),
    ("non-discrimination", "Human rights"),
    ("judicial cooperation in civil", "Security and Justice"),
    ("macro-financial assistance", "Foreign affairs"),
    ("transport regulations", "Transport"),
    ("road safety", "Transport"),
    ("roadworthiness", "Transport"),
    ("driving licence", "Transport"),
    ("implementation of eu law", "Democracy"),
    ("common commercial policy", "International trade"),
    ("trans-european transport", "Transport"),
    ("regional cooperation", "Foreign affairs"),
    ("cross-border cooperation", "Foreign affairs"),
];

/// Topics under-represented in the raw index, added to the vocabulary
/// regardless of whether any labelled vote carries them.
pub const SUPPLEMENTAL_TOPICS: &[&str] = &[
    "Human rights",
    "Democracy",
    "Data protection and privacy",
    "Security and Justice",
    "Transport",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_keywords_are_lowercase() {
        for (keyword, _) in MAPPING_RULES {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }

    #[test]
    fn every_rule_has_a_nonempty_topic() {
        for (keyword, topic) in MAPPING_RULES {
            assert!(!keyword.is_empty());
            assert!(!topic.is_empty());
        }
    }
}
