//! Canned logo search used when no real search backend is configured.

use agenda_traits::{LogoSearch, LogoSuggestions, SearchError};

struct MockEntry {
    company: &'static str,
    logo_url: &'static str,
    alternates: [&'static str; 4],
}

const KNOWN_LOGOS: &[MockEntry] = &[
    MockEntry {
        company: "microsoft",
        logo_url: "https://upload.wikimedia.org/wikipedia/commons/4/44/Microsoft_logo.svg",
        alternates: [
            "https://upload.wikimedia.org/wikipedia/commons/9/96/Microsoft_logo_%282012%29.svg",
            "https://upload.wikimedia.org/wikipedia/commons/2/25/Microsoft_icon.svg",
            "https://logos-world.net/wp-content/uploads/2020/09/Microsoft-Logo-700x394.png",
            "https://1000logos.net/wp-content/uploads/2017/04/Microsoft-logo.jpg",
        ],
    },
    MockEntry {
        company: "apple",
        logo_url: "https://upload.wikimedia.org/wikipedia/commons/f/fa/Apple_logo_black.svg",
        alternates: [
            "https://upload.wikimedia.org/wikipedia/commons/1/1b/Apple_logo_grey.svg",
            "https://www.apple.com/ac/structured-data/images/knowledge_graph_logo.png",
            "https://1000logos.net/wp-content/uploads/2016/10/Apple-Logo.png",
            "https://logos-world.net/wp-content/uploads/2020/04/Apple-Logo.png",
        ],
    },
    MockEntry {
        company: "google",
        logo_url: "https://upload.wikimedia.org/wikipedia/commons/2/2f/Google_2015_logo.svg",
        alternates: [
            "https://upload.wikimedia.org/wikipedia/commons/thumb/5/53/Google_%22G%22_Logo.svg/800px-Google_%22G%22_Logo.svg.png",
            "https://www.google.com/images/branding/googlelogo/2x/googlelogo_color_272x92dp.png",
            "https://logos-world.net/wp-content/uploads/2020/09/Google-Logo-700x394.png",
            "https://1000logos.net/wp-content/uploads/2016/11/New-Google-Logo.jpg",
        ],
    },
];

const DEFAULT_LOGO: MockEntry = MockEntry {
    company: "",
    logo_url: "https://via.placeholder.com/150?text=Company+Logo",
    alternates: [
        "https://via.placeholder.com/150/0000FF/FFFFFF?text=Option+1",
        "https://via.placeholder.com/150/FF0000/FFFFFF?text=Option+2",
        "https://via.placeholder.com/150/00FF00/FFFFFF?text=Option+3",
        "https://via.placeholder.com/150/FFFF00/000000?text=Option+4",
    ],
};

/// Offline search backend with a fixed table of well-known companies.
///
/// Lookup is case-insensitive and ignores surrounding whitespace. Unknown
/// companies get a placeholder result rather than an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockLogoSearch;

impl LogoSearch for MockLogoSearch {
    fn find_logo(&self, company: &str) -> Result<LogoSuggestions, SearchError> {
        let key = company.trim().to_lowercase();
        if key.is_empty() {
            return Err(SearchError::MissingCompany);
        }

        let entry = KNOWN_LOGOS
            .iter()
            .find(|entry| entry.company == key)
            .unwrap_or(&DEFAULT_LOGO);
        log::debug!("Mock logo search for '{}' served {}", company, entry.logo_url);

        Ok(LogoSuggestions::new(
            entry.logo_url,
            entry.logo_url,
            entry.alternates.iter().map(|url| url.to_string()),
        ))
    }

    fn name(&self) -> &'static str {
        "MockLogoSearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_company() {
        let result = MockLogoSearch.find_logo("Microsoft").unwrap();
        assert!(result.logo_url.contains("Microsoft_logo"));
        assert_eq!(result.thumbnail_url, result.logo_url);
        assert_eq!(result.additional_results.len(), 4);
    }

    #[test]
    fn test_unknown_company_gets_placeholder() {
        let result = MockLogoSearch.find_logo("nonexistentcompany123").unwrap();
        assert_eq!(result.logo_url, DEFAULT_LOGO.logo_url);
    }

    #[test]
    fn test_empty_company_is_rejected() {
        assert_eq!(MockLogoSearch.find_logo("  "), Err(SearchError::MissingCompany));
    }
}
