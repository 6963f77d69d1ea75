//! Static registry of major national outlets.
//!
//! Keyed by domain with partial matching as a fallback, so both
//! "news.bbc.co.uk" and "bbc.co.uk" resolve. Lookups never fail; an
//! unmatched source gets the unknown sentinel.

use std::collections::HashMap;

use lazy_static::lazy_static;

use gn_core::{MediaInfo, MediaRegistry};

struct Outlet {
    domain: &'static str,
    name: &'static str,
    media_type: &'static str,
    category: &'static str,
    country: &'static str,
}

const OUTLETS: &[Outlet] = &[
    Outlet { domain: "cnn.com", name: "CNN", media_type: "private", category: "broadcasting", country: "US" },
    Outlet { domain: "foxnews.com", name: "Fox News", media_type: "private", category: "broadcasting", country: "US" },
    Outlet { domain: "nytimes.com", name: "The New York Times", media_type: "private", category: "newspaper", country: "US" },
    Outlet { domain: "washingtonpost.com", name: "The Washington Post", media_type: "private", category: "newspaper", country: "US" },
    Outlet { domain: "apnews.com", name: "Associated Press", media_type: "private", category: "newspaper", country: "US" },
    Outlet { domain: "bbc.co.uk", name: "BBC", media_type: "public", category: "broadcasting", country: "GB" },
    Outlet { domain: "bbc.com", name: "BBC", media_type: "public", category: "broadcasting", country: "GB" },
    Outlet { domain: "theguardian.com", name: "The Guardian", media_type: "private", category: "newspaper", country: "GB" },
    Outlet { domain: "reuters.com", name: "Reuters", media_type: "private", category: "newspaper", country: "GB" },
    Outlet { domain: "lemonde.fr", name: "Le Monde", media_type: "private", category: "newspaper", country: "FR" },
    Outlet { domain: "france24.com", name: "France 24", media_type: "public", category: "broadcasting", country: "FR" },
    Outlet { domain: "dw.com", name: "Deutsche Welle", media_type: "public", category: "broadcasting", country: "DE" },
    Outlet { domain: "kbs.co.kr", name: "KBS", media_type: "public", category: "broadcasting", country: "KR" },
    Outlet { domain: "yonhapnews.co.kr", name: "Yonhap News", media_type: "private", category: "newspaper", country: "KR" },
    Outlet { domain: "chosun.com", name: "The Chosun Ilbo", media_type: "private", category: "newspaper", country: "KR" },
    Outlet { domain: "joongang.co.kr", name: "JoongAng Ilbo", media_type: "private", category: "newspaper", country: "KR" },
    Outlet { domain: "koreaherald.com", name: "The Korea Herald", media_type: "private", category: "newspaper", country: "KR" },
    Outlet { domain: "nhk.or.jp", name: "NHK", media_type: "public", category: "broadcasting", country: "JP" },
    Outlet { domain: "asahi.com", name: "The Asahi Shimbun", media_type: "private", category: "newspaper", country: "JP" },
    Outlet { domain: "cctv.com", name: "CCTV", media_type: "public", category: "broadcasting", country: "CN" },
    Outlet { domain: "chinadaily.com.cn", name: "China Daily", media_type: "public", category: "newspaper", country: "CN" },
    Outlet { domain: "globaltimes.cn", name: "Global Times", media_type: "public", category: "newspaper", country: "CN" },
    Outlet { domain: "xinhuanet.com", name: "Xinhua", media_type: "public", category: "newspaper", country: "CN" },
    Outlet { domain: "rt.com", name: "RT", media_type: "public", category: "broadcasting", country: "RU" },
    Outlet { domain: "tass.com", name: "TASS", media_type: "public", category: "newspaper", country: "RU" },
    Outlet { domain: "aljazeera.com", name: "Al Jazeera", media_type: "public", category: "broadcasting", country: "QA" },
    Outlet { domain: "timesofindia.com", name: "The Times of India", media_type: "private", category: "newspaper", country: "IN" },
    Outlet { domain: "abc.net.au", name: "ABC News", media_type: "public", category: "broadcasting", country: "AU" },
    Outlet { domain: "cbc.ca", name: "CBC", media_type: "public", category: "broadcasting", country: "CA" },
    Outlet { domain: "folha.uol.com.br", name: "Folha de S.Paulo", media_type: "private", category: "newspaper", country: "BR" },
];

lazy_static! {
    static ref BY_DOMAIN: HashMap<&'static str, &'static Outlet> =
        OUTLETS.iter().map(|o| (o.domain, o)).collect();
}

#[derive(Debug, Default)]
pub struct StaticMediaRegistry;

impl StaticMediaRegistry {
    pub fn new() -> Self {
        Self
    }
}

fn info_of(outlet: &Outlet) -> MediaInfo {
    MediaInfo {
        name: outlet.name.to_string(),
        media_type: outlet.media_type.to_string(),
        category: outlet.category.to_string(),
        country: outlet.country.to_string(),
    }
}

impl MediaRegistry for StaticMediaRegistry {
    fn lookup(&self, source_or_domain: &str, country_hint: Option<&str>) -> MediaInfo {
        let needle = source_or_domain.trim().to_lowercase();
        if needle.is_empty() {
            return MediaInfo::unknown();
        }

        if let Some(outlet) = BY_DOMAIN.get(needle.as_str()) {
            return info_of(outlet);
        }

        // Partial matching: subdomains ("edition.cnn.com") and display names
        // ("BBC News").
        let mut matches: Vec<&Outlet> = OUTLETS
            .iter()
            .filter(|o| {
                needle.contains(o.domain)
                    || needle.contains(&o.name.to_lowercase())
                    || o.name.to_lowercase().contains(&needle)
            })
            .collect();

        if let Some(hint) = country_hint {
            if let Some(outlet) = matches.iter().find(|o| o.country == hint) {
                return info_of(outlet);
            }
        }
        let result = matches
            .drain(..)
            .next()
            .map(info_of)
            .unwrap_or_else(MediaInfo::unknown);
        result
    }
}
