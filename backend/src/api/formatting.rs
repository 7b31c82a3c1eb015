//! Display formatting for counts and license URLs.

const CC_LICENSES: &str = "http://creativecommons.org/licenses/";

/// `1000` -> `"1,000"`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Short label for a license URL; unknown URLs are returned unchanged.
pub fn fmt_licenseurl(url: &str) -> String {
    if url.starts_with("http://creativecommons.org/publicdomain/zero/1.0") {
        return "CC0 1.0".to_string();
    }
    if url.starts_with("http://creativecommons.org/") && url.to_lowercase().contains("publicdomain") {
        return "Public domain".to_string();
    }
    if let Some(rest) = url.strip_prefix(CC_LICENSES) {
        return format!("CC {}", rest.to_uppercase().replace('/', " ").trim());
    }
    url.to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-5), "-5");
        assert_eq!(group_thousands(-5000), "-5,000");
    }

    #[test]
    fn creative_commons_urls_get_short_labels() {
        assert_eq!(fmt_licenseurl("http://creativecommons.org/licenses/by-nc-nd/3.0/us/"), "CC BY-NC-ND 3.0 US");
        assert_eq!(fmt_licenseurl("http://creativecommons.org/publicdomain/zero/1.0/"), "CC0 1.0");
        assert_eq!(fmt_licenseurl("http://creativecommons.org/licenses/publicdomain/"), "Public domain");
        assert_eq!(fmt_licenseurl("x"), "x");
    }
}
