/// Client category derived from the User-Agent header. Advisory metadata
/// only; it carries no security weight, so unknown agents just fall back to
/// DESKTOP rather than failing the request.
pub fn device_type_from_user_agent(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();

    if ua.contains("bot") || ua.contains("crawler") || ua.contains("spider") {
        "BOT"
    } else if ua.contains("ipad") || ua.contains("tablet") || ua.contains("kindle") {
        "TABLET"
    } else if ua.contains("mobile") || ua.contains("iphone") || ua.contains("android") {
        "PHONE"
    } else if ua.contains("smarttv") || ua.contains("smart-tv") || ua.contains("appletv") {
        "TV"
    } else {
        "DESKTOP"
    }
}
