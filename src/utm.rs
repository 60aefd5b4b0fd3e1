/// Campaign parameter stripping

const UTM_PREFIX: &str = "utm_";

/// Drop every `utm_*` query parameter from a URL
///
/// Works on the raw string: the URL is split on the first `?`, the query on
/// `&`, and parameters whose name starts with `utm_` are removed. Nothing is
/// decoded and the surviving parameters keep their order. Empty segments
/// (`a?&id=5`, `a?id=5&`) are dropped. When no parameter survives the `?`
/// goes too.
///
/// Examples:
/// - `https://x.com/a?utm_source=x&id=5` → `https://x.com/a?id=5`
/// - `https://x.com/a?utm_source=x` → `https://x.com/a`
pub fn remove_utm_params(url: &str) -> String {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) if !query.is_empty() => (base, query),
        Some((base, _)) => return base.to_string(),
        None => return url.to_string(),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty() && !param.starts_with(UTM_PREFIX))
        .collect();

    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept.join("&"))
    }
}
