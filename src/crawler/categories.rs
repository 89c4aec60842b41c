//! Directory category table and listing URL construction

use crate::config::CategoryEntry;

/// A top-level content genre with its own listing base URL
///
/// Immutable once the category table is built at startup.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub url: String,
}

/// Forms a fully qualified listing page URL from a category base, an index
/// letter, and a page number
pub fn listing_page_url(base: &str, letter: char, page: u32) -> String {
    format!("{}&letter={}&page={}", base, letter, page)
}

/// The builtin directory category table
pub fn builtin_categories() -> Vec<Category> {
    const TABLE: &[(&str, &str)] = &[
        ("arts", "https://itunes.apple.com/us/genre/podcasts-arts/id1301?"),
        (
            "business",
            "https://itunes.apple.com/us/genre/podcasts-business/id1321?",
        ),
        (
            "comedy",
            "https://itunes.apple.com/us/genre/podcasts-comedy/id1303?",
        ),
        (
            "education",
            "https://itunes.apple.com/us/genre/podcasts-education/id1304?",
        ),
        (
            "games_and_hobbies",
            "https://itunes.apple.com/us/genre/podcasts-games-hobbies/id1323?",
        ),
        (
            "government_and_organizations",
            "https://itunes.apple.com/us/genre/podcasts-government-organizations/id1325?",
        ),
        (
            "health",
            "https://itunes.apple.com/us/genre/podcasts-health/id1307?",
        ),
        (
            "kids_and_family",
            "https://itunes.apple.com/us/genre/podcasts-kids-family/id1305?",
        ),
        (
            "music",
            "https://itunes.apple.com/us/genre/podcasts-music/id1310?",
        ),
        (
            "news_and_politics",
            "https://itunes.apple.com/us/genre/podcasts-news-politics/id1311?",
        ),
        (
            "religion_and_spirituality",
            "https://itunes.apple.com/us/genre/podcasts-religion-spirituality/id1314?",
        ),
        (
            "science_and_medicine",
            "https://itunes.apple.com/us/genre/podcasts-science-medicine/id1315?",
        ),
        (
            "society_and_culture",
            "https://itunes.apple.com/us/genre/podcasts-society-culture/id1324?",
        ),
        (
            "sports_and_recreation",
            "https://itunes.apple.com/us/genre/podcasts-sports-recreation/id1316?",
        ),
        (
            "tv_and_film",
            "https://itunes.apple.com/us/genre/podcasts-tv-film/id1309?",
        ),
        (
            "technology",
            "https://itunes.apple.com/us/genre/podcasts-technology/id1318?",
        ),
    ];

    TABLE
        .iter()
        .map(|(name, url)| Category {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect()
}

/// Builds the category table from config overrides, falling back to the
/// builtin table when none are given
pub fn categories_from_config(entries: &[CategoryEntry]) -> Vec<Category> {
    if entries.is_empty() {
        builtin_categories()
    } else {
        entries
            .iter()
            .map(|e| Category {
                name: e.name.clone(),
                url: e.url.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_page_url() {
        let url = listing_page_url("https://example.com/genre/comedy?", 'A', 3);
        assert_eq!(url, "https://example.com/genre/comedy?&letter=A&page=3");
    }

    #[test]
    fn test_builtin_table_size() {
        assert_eq!(builtin_categories().len(), 16);
    }

    #[test]
    fn test_config_overrides_replace_builtin() {
        let entries = vec![CategoryEntry {
            name: "comedy".to_string(),
            url: "https://example.com/comedy?".to_string(),
        }];

        let categories = categories_from_config(&entries);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "comedy");
    }

    #[test]
    fn test_empty_overrides_use_builtin() {
        let categories = categories_from_config(&[]);
        assert_eq!(categories.len(), 16);
    }
}
