//! Declarative strategy template table and the static reference lookups it
//! draws from.
//!
//! Each template is tagged data: an id, a family, an applicability
//! condition, and a pure generator from film fields to keyword slots. The
//! generator never touches the network or the profile; weighting and
//! filtering happen in [`super::generator`].

use once_cell::sync::Lazy;

use crate::film::FilmRecord;
use crate::util::text;

use super::{ConfidenceTier, KeywordSlots, StrategyCategory};

/// Output of one template generator: the compiled slots plus a short label
/// for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery {
    pub slots: KeywordSlots,
    pub description: String,
}

impl GeneratedQuery {
    fn new(slots: KeywordSlots, description: impl Into<String>) -> Self {
        Self {
            slots,
            description: description.into(),
        }
    }
}

/// One registered strategy template.
pub struct StrategyTemplate {
    pub kind: &'static str,
    pub category: StrategyCategory,
    pub tier: ConfidenceTier,
    pub default_weight: f32,
    pub condition: fn(&FilmRecord) -> bool,
    pub generate: fn(&FilmRecord) -> Option<GeneratedQuery>,
}

/// Known alternate spellings of frequently-misprinted authors.
static AUTHOR_VARIANTS: &[(&str, &str)] = &[
    ("l. frank baum", "Lyman Frank Baum"),
    ("w. somerset maugham", "Somerset Maugham"),
    ("erich maria remarque", "Erich Remarque"),
    ("p. g. wodehouse", "Pelham Grenville Wodehouse"),
];

/// Trade-press shorthand for the major studios.
static STUDIO_ABBREVIATIONS: &[(&str, &str)] = &[
    ("metro-goldwyn-mayer", "MGM"),
    ("radio-keith-orpheum", "RKO"),
    ("rko radio pictures", "RKO"),
    ("warner bros.", "Warners"),
    ("warner brothers", "Warners"),
    ("united artists", "UA"),
    ("twentieth century-fox", "20th-Fox"),
    ("paramount pictures", "Paramount"),
];

/// Principal billing for titles whose input rows often omit the cast.
static KNOWN_STARS: &[(&str, &[&str])] = &[
    ("the wizard of oz", &["Judy Garland", "Frank Morgan"]),
    ("gone with the wind", &["Clark Gable", "Vivien Leigh"]),
    ("stagecoach", &["John Wayne", "Claire Trevor"]),
    ("mr. smith goes to washington", &["James Stewart"]),
    ("the grapes of wrath", &["Henry Fonda"]),
];

/// Source novels for well-known adaptations.
static KNOWN_ADAPTATIONS: &[(&str, &str)] = &[
    ("the wizard of oz", "The Wonderful Wizard of Oz"),
    ("gone with the wind", "Gone with the Wind"),
    ("the grapes of wrath", "The Grapes of Wrath"),
    ("rebecca", "Rebecca"),
    ("wuthering heights", "Wuthering Heights"),
];

/// Title keywords that imply a period genre label.
static GENRE_HINTS: &[(&str, &str)] = &[
    ("war", "war"),
    ("west", "western"),
    ("range", "western"),
    ("love", "romance"),
    ("romance", "romance"),
    ("murder", "mystery"),
    ("phantom", "horror"),
];

fn author_variant(author: &str) -> Option<&'static str> {
    let folded = author.trim().to_lowercase();
    AUTHOR_VARIANTS
        .iter()
        .find(|(known, _)| *known == folded)
        .map(|(_, variant)| *variant)
}

fn studio_abbreviation(studio: &str) -> Option<&'static str> {
    let folded = studio.trim().to_lowercase();
    STUDIO_ABBREVIATIONS
        .iter()
        .find(|(known, _)| *known == folded)
        .map(|(_, abbrev)| *abbrev)
}

fn known_stars(title: &str) -> Option<&'static [&'static str]> {
    let folded = title.trim().to_lowercase();
    KNOWN_STARS
        .iter()
        .find(|(known, _)| *known == folded)
        .map(|(_, stars)| *stars)
}

fn source_novel(title: &str) -> Option<&'static str> {
    let folded = title.trim().to_lowercase();
    KNOWN_ADAPTATIONS
        .iter()
        .find(|(known, _)| *known == folded)
        .map(|(_, novel)| *novel)
}

fn infer_genre(title: &str) -> Option<&'static str> {
    let folded = title.to_lowercase();
    GENRE_HINTS
        .iter()
        .find(|(hint, _)| {
            folded
                .split_whitespace()
                .any(|word| word.trim_matches(|c: char| !c.is_alphanumeric()) == *hint)
        })
        .map(|(_, genre)| *genre)
}

fn quoted(phrase: &str) -> String {
    format!("\"{phrase}\"")
}

fn always(_: &FilmRecord) -> bool {
    true
}

fn has_author(film: &FilmRecord) -> bool {
    film.author.is_some()
}

fn has_director(film: &FilmRecord) -> bool {
    film.director.is_some()
}

fn has_studio(film: &FilmRecord) -> bool {
    film.studio.is_some()
}

/// The full registered template table, in catalog order.
///
/// Catalog order is the stable tie-break within equal weight and tier, so
/// templates are listed roughly from precise phrasings to speculative ones.
#[must_use]
pub fn templates() -> &'static [StrategyTemplate] {
    static TEMPLATES: Lazy<Vec<StrategyTemplate>> = Lazy::new(build_templates);
    &TEMPLATES
}

#[allow(clippy::too_many_lines)]
fn build_templates() -> Vec<StrategyTemplate> {
    vec![
        // --- Title family -------------------------------------------------
        StrategyTemplate {
            kind: "exact_title",
            category: StrategyCategory::Title,
            tier: ConfidenceTier::High,
            default_weight: 2.5,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::single(quoted(&film.title)),
                    "exact title phrase",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_no_article",
            category: StrategyCategory::Title,
            tier: ConfidenceTier::High,
            default_weight: 2.2,
            condition: |film| text::strip_leading_article(&film.title).is_some(),
            generate: |film| {
                let stripped = text::strip_leading_article(&film.title)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::single(quoted(stripped)),
                    "title phrase without leading article",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_no_article_unquoted",
            category: StrategyCategory::Title,
            tier: ConfidenceTier::Medium,
            default_weight: 1.6,
            condition: |film| text::strip_leading_article(&film.title).is_some(),
            generate: |film| {
                let stripped = text::strip_leading_article(&film.title)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::single(stripped),
                    "unquoted title without leading article",
                ))
            },
        },
        StrategyTemplate {
            kind: "abbreviated_title",
            category: StrategyCategory::Title,
            tier: ConfidenceTier::Medium,
            default_weight: 1.2,
            condition: always,
            generate: |film| {
                let tokens = text::significant_tokens(&film.title);
                if tokens.len() < 2 {
                    return None;
                }
                Some(GeneratedQuery::new(
                    KeywordSlots::single(tokens[..2].join(" ")),
                    "first two significant title words",
                ))
            },
        },
        StrategyTemplate {
            kind: "possessive_title",
            category: StrategyCategory::Title,
            tier: ConfidenceTier::Low,
            default_weight: 0.6,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::single(format!("{}'s", film.title)),
                    "possessive title form",
                ))
            },
        },
        StrategyTemplate {
            kind: "keyword_film",
            category: StrategyCategory::Title,
            tier: ConfidenceTier::Medium,
            default_weight: 1.0,
            condition: |film| text::extract_keyword(&film.title).is_some(),
            generate: |film| {
                let keyword = text::extract_keyword(&film.title)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(keyword, "film"),
                    "distinctive title keyword plus film",
                ))
            },
        },
        // --- Creator family -----------------------------------------------
        StrategyTemplate {
            kind: "author_title",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::High,
            default_weight: 2.0,
            condition: has_author,
            generate: |film| {
                let author = film.author.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(author, film.title.clone()),
                    "author with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "author_only",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: has_author,
            generate: |film| {
                let author = film.author.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::single(author),
                    "author alone",
                ))
            },
        },
        StrategyTemplate {
            kind: "author_lastname_title",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::Medium,
            default_weight: 1.4,
            condition: has_author,
            generate: |film| {
                let surname = text::last_name(film.author.as_deref()?)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(surname, film.title.clone()),
                    "author surname with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "author_variant_title",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::Medium,
            default_weight: 1.1,
            condition: |film| {
                film.author
                    .as_deref()
                    .and_then(author_variant)
                    .is_some()
            },
            generate: |film| {
                let variant = author_variant(film.author.as_deref()?)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(variant, film.title.clone()),
                    "known author spelling variant with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "director_title",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::High,
            default_weight: 1.9,
            condition: has_director,
            generate: |film| {
                let director = film.director.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(director, film.title.clone()),
                    "director with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "director_only",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::Low,
            default_weight: 0.4,
            condition: has_director,
            generate: |film| {
                let director = film.director.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::single(director),
                    "director alone",
                ))
            },
        },
        StrategyTemplate {
            kind: "director_lastname_title",
            category: StrategyCategory::Creator,
            tier: ConfidenceTier::Medium,
            default_weight: 1.0,
            condition: has_director,
            generate: |film| {
                let surname = text::last_name(film.director.as_deref()?)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::triple(surname, "director", film.title.clone()),
                    "director surname qualified with title",
                ))
            },
        },
        // --- Production family --------------------------------------------
        StrategyTemplate {
            kind: "studio_title",
            category: StrategyCategory::Production,
            tier: ConfidenceTier::High,
            default_weight: 1.8,
            condition: has_studio,
            generate: |film| {
                let studio = film.studio.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(studio, film.title.clone()),
                    "studio with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "studio_abbrev_title",
            category: StrategyCategory::Production,
            tier: ConfidenceTier::Medium,
            default_weight: 1.2,
            condition: |film| {
                film.studio
                    .as_deref()
                    .and_then(studio_abbreviation)
                    .is_some()
            },
            generate: |film| {
                let abbrev = studio_abbreviation(film.studio.as_deref()?)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(abbrev, film.title.clone()),
                    "trade-press studio shorthand with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "studio_production",
            category: StrategyCategory::Production,
            tier: ConfidenceTier::Low,
            default_weight: 0.6,
            condition: has_studio,
            generate: |film| {
                let studio = film.studio.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(studio, "production"),
                    "studio production coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_box_office",
            category: StrategyCategory::Production,
            tier: ConfidenceTier::Medium,
            default_weight: 1.3,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "box office"),
                    "box office reporting",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_exhibitor",
            category: StrategyCategory::Production,
            tier: ConfidenceTier::Low,
            default_weight: 0.8,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "exhibitor"),
                    "exhibitor reaction",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_production_filming",
            category: StrategyCategory::Production,
            tier: ConfidenceTier::Low,
            default_weight: 0.7,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "production filming"),
                    "production and filming notes",
                ))
            },
        },
        // --- Star family --------------------------------------------------
        StrategyTemplate {
            kind: "star_title",
            category: StrategyCategory::Star,
            tier: ConfidenceTier::Medium,
            default_weight: 1.5,
            condition: |film| !film.stars.is_empty(),
            generate: |film| {
                let star = film.stars.first()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(star.clone(), film.title.clone()),
                    "top-billed star with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "second_star_title",
            category: StrategyCategory::Star,
            tier: ConfidenceTier::Medium,
            default_weight: 1.2,
            condition: |film| film.stars.len() >= 2,
            generate: |film| {
                let star = film.stars.get(1)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(star.clone(), film.title.clone()),
                    "second-billed star with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "known_star_title",
            category: StrategyCategory::Star,
            tier: ConfidenceTier::Medium,
            default_weight: 1.0,
            condition: |film| known_stars(&film.title).is_some(),
            generate: |film| {
                let star = known_stars(&film.title)?.first()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(*star, film.title.clone()),
                    "documented principal billing with title",
                ))
            },
        },
        // --- Contextual family --------------------------------------------
        StrategyTemplate {
            kind: "novel_adaptation",
            category: StrategyCategory::Contextual,
            tier: ConfidenceTier::Medium,
            default_weight: 1.1,
            condition: |film| source_novel(&film.title).is_some(),
            generate: |film| {
                let novel = source_novel(&film.title)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(novel, "adaptation"),
                    "source novel adaptation coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "novel_title",
            category: StrategyCategory::Contextual,
            tier: ConfidenceTier::Medium,
            default_weight: 1.0,
            condition: |film| source_novel(&film.title).is_some(),
            generate: |film| {
                let novel = source_novel(&film.title)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(novel, film.title.clone()),
                    "source novel with title",
                ))
            },
        },
        StrategyTemplate {
            kind: "genre_title",
            category: StrategyCategory::Contextual,
            tier: ConfidenceTier::Low,
            default_weight: 0.6,
            condition: |film| infer_genre(&film.title).is_some(),
            generate: |film| {
                let genre = infer_genre(&film.title)?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(genre, film.title.clone()),
                    "inferred genre with title",
                ))
            },
        },
        // --- Labor family (opt-in) ----------------------------------------
        StrategyTemplate {
            kind: "title_picketed",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "picketed"),
                    "picketing coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_work_stoppage",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "work stoppage"),
                    "work stoppage coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_picket_line",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "picket line"),
                    "picket line coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "title_walk_out",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: always,
            generate: |film| {
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(film.title.clone(), "walk out"),
                    "walk out coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "studio_labor_dispute",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: has_studio,
            generate: |film| {
                let studio = film.studio.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(studio, "labor dispute"),
                    "studio labor dispute coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "studio_boycott",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: has_studio,
            generate: |film| {
                let studio = film.studio.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(studio, "boycott"),
                    "studio boycott coverage",
                ))
            },
        },
        StrategyTemplate {
            kind: "studio_strike_action",
            category: StrategyCategory::Labor,
            tier: ConfidenceTier::Low,
            default_weight: 0.5,
            condition: has_studio,
            generate: |film| {
                let studio = film.studio.as_deref()?;
                Some(GeneratedQuery::new(
                    KeywordSlots::pair(studio, "strike action"),
                    "studio strike coverage",
                ))
            },
        },
    ]
}
