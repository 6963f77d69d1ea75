//! Origin-country inference from a news domain's TLD.

/// Suffix table, longest suffixes first so `.co.uk` wins over `.uk`.
/// `.com` defaults to US; anything unmapped is `Unknown`.
const TLD_COUNTRIES: &[(&str, &str)] = &[
    (".co.uk", "GB"),
    (".org.uk", "GB"),
    (".ac.uk", "GB"),
    (".com.au", "AU"),
    (".net.au", "AU"),
    (".co.kr", "KR"),
    (".or.kr", "KR"),
    (".go.kr", "KR"),
    (".co.jp", "JP"),
    (".or.jp", "JP"),
    (".ne.jp", "JP"),
    (".com.cn", "CN"),
    (".org.cn", "CN"),
    (".com.br", "BR"),
    (".com.mx", "MX"),
    (".co.in", "IN"),
    (".co.za", "ZA"),
    (".com.tr", "TR"),
    (".com.ar", "AR"),
    (".com.sg", "SG"),
    (".com.hk", "HK"),
    (".uk", "GB"),
    (".kr", "KR"),
    (".jp", "JP"),
    (".cn", "CN"),
    (".fr", "FR"),
    (".de", "DE"),
    (".ru", "RU"),
    (".in", "IN"),
    (".au", "AU"),
    (".ca", "CA"),
    (".br", "BR"),
    (".mx", "MX"),
    (".it", "IT"),
    (".es", "ES"),
    (".nl", "NL"),
    (".se", "SE"),
    (".ch", "CH"),
    (".at", "AT"),
    (".pl", "PL"),
    (".za", "ZA"),
    (".tr", "TR"),
    (".sg", "SG"),
    (".hk", "HK"),
    (".tw", "TW"),
    (".id", "ID"),
    (".ar", "AR"),
    (".qa", "QA"),
    (".ae", "AE"),
    (".il", "IL"),
    (".ua", "UA"),
    (".com", "US"),
];

/// Infer the origin country of a news domain from its TLD.
pub fn country_for_domain(domain: &str) -> String {
    let normalized = domain.trim().trim_end_matches('.').to_lowercase();
    for (suffix, code) in TLD_COUNTRIES {
        if normalized.ends_with(suffix) {
            return (*code).to_string();
        }
    }
    "Unknown".to_string()
}
