//! Locale-driven address styles for mailing labels.
//!
//! The partition of locales is fixed, read-only data: a US-style group, a
//! UK/Irish/South-African group, and a European default that also absorbs
//! any locale not listed. Address line conventions follow
//! <https://bitboost.com/ref/internal-address-formats/>.

/// Locales whose labels put `town county postcode` on the final line.
const CITY_STATE_ZIP_LOCALES: &[&str] = &[
    "en", "en_CA", "en_AU", "en_IN", "en_KA", "en_PH", "en_TH", "en_VN", "th",
];

/// Locales whose labels give town, county, and postcode a line each.
const POSTCODE_LAST_LOCALES: &[&str] = &["en_GB", "en_IE", "en_ZA"];

/// Address line arrangement for one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressStyle {
    /// US style: `town county postcode` on one line.
    CityStateZip,
    /// UK style: town, county, and postcode each on their own line.
    PostcodeLast,
    /// European style: `postcode town county` on one line. The default.
    PostcodeFirst,
}

impl AddressStyle {
    /// Select the style for a locale identifier, e.g. `en_GB` or `fr`.
    ///
    /// Unknown locales silently fall back to the European default.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        if CITY_STATE_ZIP_LOCALES.contains(&locale) {
            Self::CityStateZip
        } else if POSTCODE_LAST_LOCALES.contains(&locale) {
            Self::PostcodeLast
        } else {
            Self::PostcodeFirst
        }
    }

    /// Merge template for this style, using literal `<<`/`>>` tags.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::CityStateZip => "<<NAME>>\n<<ADDRESS>>\n<<TOWN>> <<COUNTY>> <<POSTCODE>>",
            Self::PostcodeLast => "<<NAME>>\n<<ADDRESS>>\n<<TOWN>>\n<<COUNTY>>\n<<POSTCODE>>",
            Self::PostcodeFirst => "<<NAME>>\n<<ADDRESS>>\n<<POSTCODE>> <<TOWN>> <<COUNTY>>",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_group_locales_use_city_state_zip() {
        for locale in ["en", "en_AU", "th"] {
            assert_eq!(AddressStyle::for_locale(locale), AddressStyle::CityStateZip);
        }
    }

    #[test]
    fn uk_group_locales_put_the_postcode_last() {
        for locale in ["en_GB", "en_IE", "en_ZA"] {
            assert_eq!(AddressStyle::for_locale(locale), AddressStyle::PostcodeLast);
        }
    }

    #[test]
    fn everything_else_defaults_to_postcode_first() {
        for locale in ["fr", "de", "nl", "xx_YY", ""] {
            assert_eq!(AddressStyle::for_locale(locale), AddressStyle::PostcodeFirst);
        }
    }
}
