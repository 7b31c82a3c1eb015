//! Read-only lookup tables, built once at startup and shared by every request.

use std::collections::{BTreeMap, BTreeSet};

const FACET_FIELDS: &[&str] = &[
    "noindex", "mediatype", "collection", "language_facet",
    "creator_facet", "subject_facet", "publisher_facet", "licenseurl",
    "possible-copyright-status", "rating_facet", "sponsor_facet",
    "handwritten", "source", "tuner", "aspect_ratio", "frames_per_second", "audio_codec", "video_codec",
];

const DEFAULT_FIELDS: &[&str] = &[
    "identifier", "creator", "title", "date", "subject", "collection",
    "scanner", "mediatype", "description", "noindex", "score", "case-name",
    "rating", "sponsor", "imagecount", "foldoutcount", "downloads", "date_str",
    "language", "language_facet",
];

const FIELD_SETS: &[(&str, &[&str])] = &[
    ("books", &[
        "identifier", "title", "creator", "date", "publisher", "language", "imagecount",
        "foldoutcount", "sponsor", "scanner", "collection", "mediatype",
    ]),
    ("tv", &[
        "identifier", "title", "date", "source", "tuner", "aspect_ratio",
        "frames_per_second", "audio_codec", "video_codec", "collection", "mediatype",
    ]),
    ("software", &[
        "identifier", "title", "creator", "date", "subject", "licenseurl", "downloads",
        "collection", "mediatype",
    ]),
];

/// Fields that exist in the index but are not part of any projection above.
const OTHER_KNOWN_FIELDS: &[&str] = &[
    "publicdate", "addeddate", "year_from_date", "contributor", "uploader",
    "access-restricted", "num_reviews", "avg_rating", "item_size", "runtime",
];

const RESERVED_PARAMS: &[&str] = &[
    "q", "page", "rows", "sort", "view", "field_set", "fields", "extra", "debug", "nfpr",
    "facet", "admin_filter", "date_range", "date_facet", "date_from", "date_to",
];

const LANGUAGES: &[(&str, &str)] = &[
    ("eng", "English"), ("fre", "Francais"), ("ger", "Deutsch"), ("spa", "Spanish"),
    ("ita", "Italiano"), ("lat", "Latin"), ("rus", "Russian"), ("dut", "Dutch"),
    ("ara", "Arabic"), ("swe", "Swedish"), ("por", "Portuguese"), ("dan", "Danish"),
    ("hun", "Hungarian"), ("cze", "Czech"), ("tel", "Telugu"), ("pol", "Polish"),
    ("urd", "Urdu"), ("nor", "Norwegian"), ("rum", "Romanian"), ("ice", "Icelandic"),
    ("hrv", "Croatian"), ("arm", "Armenian"), ("srp", "Serbian"), ("swa", "Swahili"),
    ("ind", "Indonesian"), ("may", "Malay"), ("slv", "Slovenian"), ("tur", "Turkish"),
    ("fin", "Finnish"), ("wel", "Welsh"), ("bul", "Bulgarian"), ("afr", "Afrikaans"),
    ("slo", "Slovak"), ("cat", "Catalan"), ("san", "Sanskrit"), ("hin", "Hindi"),
    ("chi", "Chinese"), ("vie", "Vietnamese"), ("glg", "Galician"), ("tam", "Tamil"),
    ("jpn", "Japanese"), ("tgl", "Tagalog"), ("baq", "Basque"), ("heb", "Hebrew"),
    ("gle", "Irish"), ("kan", "Kannada"), ("bos", "Bosnian"), ("ukr", "Ukrainian"),
    ("mlt", "Maltese"), ("est", "Estonian"), ("aze", "Azerbaijani"), ("lit", "Lithuanian"),
    ("alb", "Albanian"), ("tha", "Thai"), ("gre", "Greek"), ("grc", "Ancient Greek"),
    ("gae", "Scottish Gaelic"), ("mul", "Multiple"), ("und", "Undefined"), ("oji", "Ojibwa"),
    ("english-handwritten", "English (handwritten)"),
];

/// How an inbound parameter name is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Reserved,
    FacetFilter,
    /// a known field that is not a facet: becomes an output column
    ImplicitField,
    UnknownField,
}

#[derive(Debug, Clone)]
pub struct SearchTables {
    facet_fields: Vec<String>,
    default_fields: Vec<String>,
    field_sets: BTreeMap<String, Vec<String>>,
    known_fields: BTreeSet<String>,
    reserved_params: BTreeSet<String>,
    languages: BTreeMap<String, String>,
}

impl Default for SearchTables {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTables {
    pub fn new() -> Self {
        let to_vec = |fields: &[&str]| fields.iter().map(|f| f.to_string()).collect::<Vec<_>>();

        let field_sets = FIELD_SETS
            .iter()
            .map(|(name, fields)| (name.to_string(), to_vec(fields)))
            .collect::<BTreeMap<_, _>>();

        let mut known_fields = BTreeSet::new();
        known_fields.extend(DEFAULT_FIELDS.iter().map(|f| f.to_string()));
        known_fields.extend(FACET_FIELDS.iter().map(|f| f.to_string()));
        known_fields.extend(OTHER_KNOWN_FIELDS.iter().map(|f| f.to_string()));
        for fields in field_sets.values() {
            known_fields.extend(fields.iter().cloned());
        }

        Self {
            facet_fields: to_vec(FACET_FIELDS),
            default_fields: to_vec(DEFAULT_FIELDS),
            field_sets,
            known_fields,
            reserved_params: RESERVED_PARAMS.iter().map(|p| p.to_string()).collect(),
            languages: LANGUAGES.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    pub fn facet_fields(&self) -> &[String] {
        &self.facet_fields
    }

    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    pub fn field_set(&self, name: &str) -> Option<&[String]> {
        self.field_sets.get(name).map(|fields| fields.as_slice())
    }

    pub fn is_facet_field(&self, name: &str) -> bool {
        self.facet_fields.iter().any(|f| f == name)
    }

    pub fn classify_param(&self, name: &str) -> ParamKind {
        if self.reserved_params.contains(name) {
            ParamKind::Reserved
        } else if self.is_facet_field(name) {
            ParamKind::FacetFilter
        } else if self.known_fields.contains(name) {
            ParamKind::ImplicitField
        } else {
            ParamKind::UnknownField
        }
    }

    /// Human readable language name, or the code itself.
    pub fn language_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.languages.get(code).map(|s| s.as_str()).unwrap_or(code)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_classified_against_the_allow_list() {
        let tables = SearchTables::new();
        assert_eq!(tables.classify_param("q"), ParamKind::Reserved);
        assert_eq!(tables.classify_param("date_facet"), ParamKind::Reserved);
        assert_eq!(tables.classify_param("mediatype"), ParamKind::FacetFilter);
        assert_eq!(tables.classify_param("imagecount"), ParamKind::ImplicitField);
        assert_eq!(tables.classify_param("publicdate"), ParamKind::ImplicitField);
        assert_eq!(tables.classify_param("fq"), ParamKind::UnknownField);
        assert_eq!(tables.classify_param("}{!lucene"), ParamKind::UnknownField);
    }

    #[test]
    fn language_codes_map_to_names() {
        let tables = SearchTables::new();
        assert_eq!(tables.language_label("eng"), "English");
        assert_eq!(tables.language_label("ger"), "Deutsch");
        assert_eq!(tables.language_label("xxx"), "xxx");
    }

    #[test]
    fn field_sets_are_named_per_content_type() {
        let tables = SearchTables::new();
        assert!(tables.field_set("books").is_some());
        assert!(tables.field_set("tv").unwrap().contains(&"tuner".to_string()));
        assert!(tables.field_set("music").is_none());
    }
}
